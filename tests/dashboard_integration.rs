use proflow::core::DashboardAggregator;
use proflow::sources::http::HttpSource;
use proflow::sources::refresh_dashboard;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_json(server: &MockServer, url_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"),
            )
            .mount(server)
            .await;
    }

    pub async fn mount_status(server: &MockServer, url_path: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(status))
            .mount(server)
            .await;
    }

    pub async fn mount_empty_collections(server: &MockServer, project: &str, except: &str) {
        for collection in ["expenses", "invoices", "quotes"] {
            if collection != except {
                mount_json(server, &format!("/projects/{project}/{collection}"), "[]").await;
            }
        }
    }
}

// Two projects with mixed currencies: P1 has a paid USD invoice and a USD
// expense, P2 has an unpaid EUR invoice converted at 0.9 EUR per USD.
#[test_log::test(tokio::test)]
async fn test_full_dashboard_flow() {
    let server = wiremock::MockServer::start().await;

    test_utils::mount_json(
        &server,
        "/projects",
        r#"[
            {"id": "p1", "name": "Website", "customer": "Acme"},
            {"id": "p2", "name": "App", "customer": "Globex"}
        ]"#,
    )
    .await;

    test_utils::mount_json(
        &server,
        "/projects/p1/expenses",
        r#"[{"id": "e1", "amount": 40, "currency": "USD", "fxBase": "USD"}]"#,
    )
    .await;
    test_utils::mount_json(
        &server,
        "/projects/p1/invoices",
        r#"[{"id": "i1", "client": "Acme", "total": 100, "status": "paid",
             "currency": "USD", "fxBase": "USD"}]"#,
    )
    .await;
    test_utils::mount_json(&server, "/projects/p1/quotes", "[]").await;

    test_utils::mount_json(&server, "/projects/p2/expenses", "[]").await;
    test_utils::mount_json(
        &server,
        "/projects/p2/invoices",
        r#"[{"id": "i2", "client": "Globex", "total": 200, "status": "unpaid",
             "currency": "EUR", "fxBase": "USD", "fxRate": 0.9}]"#,
    )
    .await;
    test_utils::mount_json(&server, "/projects/p2/quotes", "[]").await;

    let source = HttpSource::new(&server.uri());
    let mut aggregator = DashboardAggregator::new();
    let outcome = refresh_dashboard(&source, &mut aggregator, &|| {})
        .await
        .unwrap();

    assert_eq!(outcome.projects.len(), 2);
    assert!(outcome.failures.is_empty());

    let totals = aggregator.global_totals();
    info!(?totals, "aggregated dashboard totals");
    let eur_total = 200.0 / 0.9;
    assert_eq!(totals.expenses, 40.0);
    assert_eq!(totals.invoiced, 100.0 + eur_total);
    assert_eq!(totals.paid, 100.0);
    assert!((totals.invoiced - 322.22).abs() < 0.01);
    assert!((totals.net() - 282.22).abs() < 0.01);
    assert!((totals.unpaid() - 222.22).abs() < 0.01);

    let top = aggregator.top_customers(5);
    assert_eq!(top[0].0, "Globex");
    assert!((top[0].1.unpaid - eur_total).abs() < 1e-9);
    // Acme is fully paid and ranks below Globex.
    assert_eq!(top[1].0, "Acme");
    assert_eq!(top[1].1.unpaid, 0.0);
}

#[test_log::test(tokio::test)]
async fn test_one_denied_project_does_not_sink_the_dashboard() {
    let server = wiremock::MockServer::start().await;

    test_utils::mount_json(
        &server,
        "/projects",
        r#"[
            {"id": "ok", "name": "Visible", "customer": "Acme"},
            {"id": "denied", "name": "Hidden", "customer": "Globex"}
        ]"#,
    )
    .await;

    test_utils::mount_json(
        &server,
        "/projects/ok/invoices",
        r#"[{"id": "i1", "client": "Acme", "total": 75, "status": "paid",
             "currency": "USD", "fxBase": "USD"}]"#,
    )
    .await;
    test_utils::mount_empty_collections(&server, "ok", "invoices").await;

    test_utils::mount_status(&server, "/projects/denied/expenses", 403).await;
    test_utils::mount_empty_collections(&server, "denied", "expenses").await;

    let source = HttpSource::new(&server.uri());
    let mut aggregator = DashboardAggregator::new();
    let outcome = refresh_dashboard(&source, &mut aggregator, &|| {})
        .await
        .unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].project.id, "denied");

    // Totals equal the visible project's alone: not zero, not an error.
    let totals = aggregator.global_totals();
    assert_eq!(totals.invoiced, 75.0);
    assert_eq!(totals.paid, 75.0);
}

// Documents with duck-typed fields survive the trip through a real source.
#[test_log::test(tokio::test)]
async fn test_lenient_documents_over_http() {
    let server = wiremock::MockServer::start().await;

    test_utils::mount_json(
        &server,
        "/projects",
        r#"[{"id": "p1", "name": "Messy", "customer": "Acme"}]"#,
    )
    .await;
    test_utils::mount_json(
        &server,
        "/projects/p1/expenses",
        r#"[{"id": "e1", "amount": "19.99", "currency": "usd", "fxRate": null}]"#,
    )
    .await;
    test_utils::mount_json(
        &server,
        "/projects/p1/invoices",
        r#"[{"id": "i1", "total": 50, "status": "PAID", "currency": "EUR",
             "fxBase": "USD", "fxRate": 0}]"#,
    )
    .await;
    test_utils::mount_json(&server, "/projects/p1/quotes", "[]").await;

    let source = HttpSource::new(&server.uri());
    let mut aggregator = DashboardAggregator::new();
    refresh_dashboard(&source, &mut aggregator, &|| {})
        .await
        .unwrap();

    let totals = aggregator.global_totals();
    // Blank fxBase on the expense defaults to USD, so no conversion;
    // the invoice's zero rate degrades to passthrough.
    assert_eq!(totals.expenses, 19.99);
    assert_eq!(totals.invoiced, 50.0);
    assert_eq!(totals.paid, 50.0);
}
