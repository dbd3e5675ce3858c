use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use balances::{
    client::{ApiClient, ClientConfig},
    error::Error,
    ledger::Ledger,
    report::{OutputFormat, Report},
};

/// Serve the given `(status, body)` responses, one per connection, in order.
/// Returns the URL template pointing at the server and the paths it was asked for.
fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = thread::spawn(move || {
        let mut paths = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            paths.push(request_line.split_whitespace().nth(1).unwrap().to_string());
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }

            let mut stream = reader.into_inner();
            write!(
                stream,
                "HTTP/1.1 {} Whatever\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
        }
        paths
    });

    (
        format!("http://127.0.0.1:{}/transactions/{{page}}.json", port),
        handle,
    )
}

fn client(url_template: String) -> ApiClient {
    ApiClient::new(ClientConfig {
        url_template,
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn page(number: u32, total_count: usize, records: &[(&str, &str)]) -> (u16, String) {
    let transactions = records
        .iter()
        .map(|(date, amount)| {
            serde_json::json!({
                "Date": date,
                "Ledger": "Office Expense",
                "Amount": amount,
                "Company": "AA OFFICE SUPPLIES"
            })
        })
        .collect::<Vec<_>>();
    (
        200,
        serde_json::json!({
            "totalCount": total_count,
            "page": number,
            "transactions": transactions
        })
        .to_string(),
    )
}

fn pull_and_dump(responses: Vec<(u16, String)>, format: OutputFormat) -> String {
    let (url, server) = serve(responses);
    let mut ledger = Ledger::default();
    ledger.pull_all(&client(url)).unwrap();
    server.join().unwrap();

    let mut output = Vec::<u8>::new();
    Report::try_from(&ledger)
        .unwrap()
        .serialize(format, &mut output)
        .unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn empty() {
    assert_eq!(
        pull_and_dump(vec![page(1, 0, &[])], OutputFormat::Text),
        "** total balance: 0.00\n\n"
    );
}

#[test]
fn empty_csv_keeps_header() {
    assert_eq!(
        pull_and_dump(vec![page(1, 0, &[])], OutputFormat::Csv),
        "date,balance\n"
    );
}

#[test]
fn overflowing_amounts() {
    let (url, server) = serve(vec![page(
        1,
        2,
        &[
            ("2013-12-13", "79228162514264337593543950335"),
            ("2013-12-14", "1"),
        ],
    )]);
    let mut ledger = Ledger::default();
    assert_eq!(ledger.pull_all(&client(url)), Ok(2));
    server.join().unwrap();
    assert!(matches!(
        Report::try_from(&ledger),
        Err(Error::BalanceOverflow(_))
    ));
}

#[test]
fn pages_are_requested_in_order() {
    let (url, server) = serve(vec![
        page(1, 3, &[("2013-12-13", "-100.81")]),
        page(2, 3, &[("2013-12-13", "-5.43")]),
        page(3, 3, &[("2013-12-12", "-227.35")]),
    ]);
    let mut ledger = Ledger::default();
    assert_eq!(ledger.pull_all(&client(url)), Ok(3));
    assert_eq!(
        server.join().unwrap(),
        [
            "/transactions/1.json",
            "/transactions/2.json",
            "/transactions/3.json"
        ]
    );
}

#[test]
fn running_daily_balance_over_pages() {
    assert_eq!(
        pull_and_dump(
            vec![
                page(
                    1,
                    4,
                    &[("2018-01-02", "-4.5"), ("2018-01-01", "1.5")]
                ),
                page(2, 4, &[("2018-01-03", "10"), ("2018-01-02", "5")]),
            ],
            OutputFormat::Csv
        ),
        r#"date,balance
        2018-01-01, 1.5
        2018-01-02, 2.0
        2018-01-03, 12.0
        "#
        .replace(' ', "")
    );
}

#[test]
fn text_report() {
    assert_eq!(
        pull_and_dump(
            vec![
                page(
                    1,
                    3,
                    &[("2013-12-12", "-227.35"), ("2013-12-13", "-1229.58")]
                ),
                page(2, 3, &[("2013-12-12", "-0.005")]),
            ],
            OutputFormat::Text
        ),
        [
            "** total balance: -1456.94",
            "",
            "date: 2013-12-12\trunning balance: -227.36",
            "date: 2013-12-13\trunning balance: -1456.94",
            "",
        ]
        .join("\n")
    );
}

#[test]
fn invalid_records_are_skipped() {
    let broken = serde_json::json!({
        "totalCount": 2,
        "page": 1,
        "transactions": [
            { "Date": "2013-12-13", "Ledger": "", "Amount": "lots", "Company": "Bench" },
            { "Date": "2013-12-13", "Ledger": "", "Amount": "-5.43", "Company": "Bench" }
        ]
    })
    .to_string();
    assert_eq!(
        pull_and_dump(vec![(200, broken)], OutputFormat::Csv),
        "date,balance\n2013-12-13,-5.43\n"
    );
}

#[test]
fn server_error() {
    let (url, server) = serve(vec![
        page(1, 2, &[("2013-12-13", "-100.81")]),
        (500, "{}".to_string()),
    ]);
    let page_url = url.replace("{page}", "2");
    let mut ledger = Ledger::default();
    assert_eq!(
        ledger.pull_all(&client(url)),
        Err(Error::HttpStatus {
            url: page_url,
            status: 500
        })
    );
    server.join().unwrap();
}

#[test]
fn page_mismatch() {
    let (url, server) = serve(vec![page(2, 2, &[("2013-12-13", "-100.81")])]);
    let mut ledger = Ledger::default();
    assert_eq!(
        ledger.pull_all(&client(url)),
        Err(Error::PageMismatch {
            requested: 1,
            received: 2
        })
    );
    server.join().unwrap();
}

#[test]
fn malformed_response() {
    let (url, server) = serve(vec![(200, "not json at all".to_string())]);
    let mut ledger = Ledger::default();
    assert!(matches!(
        ledger.pull_all(&client(url)),
        Err(Error::ParsingFailure(_))
    ));
    server.join().unwrap();
}
