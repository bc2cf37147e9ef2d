use mockito::{Matcher, Server};
use opendart::config::Config;
use opendart::dart::{
    BusinessReports, DartError, HttpTransport, Market, Number, ReportPeriod, TransportError,
};

fn reports_for(server_url: &str) -> BusinessReports<HttpTransport> {
    let config = Config {
        dart_api_key: Some("test-key".to_string()),
        base_url: format!("{}/api", server_url),
        ..Config::default()
    };
    BusinessReports::new(HttpTransport::from_config(&config).unwrap())
}

#[tokio::test]
async fn test_dividend_info_over_http() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/alotMatter.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("crtfc_key".into(), "test-key".into()),
            Matcher::UrlEncoded("corp_code".into(), "00126380".into()),
            Matcher::UrlEncoded("bsns_year".into(), "2023".into()),
            Matcher::UrlEncoded("reprt_code".into(), "11011".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "status": "000",
                "message": "정상",
                "list": [
                    {"rcept_no": "20240312000736", "corp_cls": "Y", "corp_code": "00126380", "corp_name": "삼성전자",
                     "se": "주식배당수익률(%)", "stock_knd": "보통주", "thstrm": "-", "frmtrm": "-", "lwfr": "-"},
                    {"rcept_no": "20240312000736", "corp_cls": "Y", "corp_code": "00126380", "corp_name": "삼성전자",
                     "se": "주당 현금배당금(원)", "stock_knd": "보통주", "thstrm": "1,444", "frmtrm": "1,444", "lwfr": "2,994"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let records = reports_for(&server.url())
        .get_dividend_info("00126380", 2023, ReportPeriod::Annual)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].filing.market, Market::Kospi);
    assert_eq!(records[0].title.as_deref(), Some("주당 현금배당금(원)"));
    assert_eq!(records[0].current_term, Number::Integer(1444));
}

#[tokio::test]
async fn test_no_data_status_is_empty() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/hyslrChgSttus.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "013", "message": "조회된 데이타가 없습니다."}"#)
        .create_async()
        .await;

    let records = reports_for(&server.url())
        .get_largest_shareholder_changes("00126380", 2023, ReportPeriod::Q1)
        .await
        .unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_error_status_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/mrhlSttus.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status": "010", "message": "등록되지 않은 키입니다."}"#)
        .create_async()
        .await;

    let err = reports_for(&server.url())
        .get_minority_shareholders_status("00126380", 2023, ReportPeriod::Annual)
        .await
        .unwrap_err();

    match err {
        DartError::Transport(TransportError::Api { status, message }) => {
            assert_eq!(status, "010");
            assert_eq!(message, "등록되지 않은 키입니다.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_http_failure_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/irdsSttus.json")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let err = reports_for(&server.url())
        .get_capital_variation("00126380", 2023, ReportPeriod::Annual)
        .await
        .unwrap_err();

    match err {
        DartError::Transport(TransportError::Api { status, message }) => {
            assert_eq!(status, "503");
            assert_eq!(message, "service unavailable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_a_transport_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/tesstkAcqsDspsSttus.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = reports_for(&server.url())
        .get_treasury_shares_status("00126380", 2023, ReportPeriod::Annual)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DartError::Transport(TransportError::InvalidPayload { .. })
    ));
}
