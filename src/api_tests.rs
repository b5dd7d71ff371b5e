#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{
        App,
        dev::Service,
        http::{header, StatusCode}, test,
    };
    use futures::future::{self, BoxFuture};
    use lazy_static::lazy_static;
    use serde_json::{json, Value};

    use crate::api::{self, AppState};
    use crate::api::estimate::EstimateResponse;
    use crate::api::health::HealthResponse;
    use crate::data::models::SuburbRecord;
    use crate::data::store::{SuburbStore, SuburbTable};
    use crate::summary::{LocalSummarizer, PropertyBrief, SummaryError, Summarizer};
    use crate::valuation::estimator::Estimator;

    const FIXTURE: &str = "\
suburb,state,postcode,median_price,annual_growth_pct,median_rent_weekly,lat,lon
Testville,TS,9999,500000,5,500,,
Richmond,VIC,3121,1150000,4.1,650,,
Footscray,VIC,3011,780000,5.2,520,,
Sunshine,VIC,3020,690000,6.3,480,,
Werribee,VIC,3030,600000,3.9,450,,
Blacktown,NSW,2148,820000,7.4,560,,
";

    lazy_static! {
        static ref RECORDS: Vec<SuburbRecord> = {
            // Parse once for all tests
            SuburbTable::from_reader(FIXTURE.as_bytes())
                .expect("Invalid test fixture")
                .records()
                .to_vec()
        };
    }

    struct FailingSummarizer;

    impl Summarizer for FailingSummarizer {
        fn summarize(&self, _brief: PropertyBrief) -> BoxFuture<'static, Result<String, SummaryError>> {
            Box::pin(future::ready(Err(SummaryError::Unavailable("offline".to_string()))))
        }

        fn source(&self) -> &'static str {
            "ai"
        }
    }

    struct CannedSummarizer;

    impl Summarizer for CannedSummarizer {
        fn summarize(&self, brief: PropertyBrief) -> BoxFuture<'static, Result<String, SummaryError>> {
            Box::pin(future::ready(Ok(format!("{} looks promising.", brief.suburb))))
        }

        fn source(&self) -> &'static str {
            "ai"
        }
    }

    fn app_state(summarizer: Arc<dyn Summarizer>) -> AppState {
        let store = SuburbStore::with_table(
            "missing.csv",
            SuburbTable::from(RECORDS.clone())
        );
        AppState::new(Arc::new(store), Estimator::default(), summarizer)
    }

    fn empty_state() -> AppState {
        AppState::new(
            Arc::new(SuburbStore::new("missing.csv")),
            Estimator::default(),
            Arc::new(LocalSummarizer)
        )
    }

    #[actix_rt::test]
    async fn test_health_reports_record_count() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(LocalSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/health")
            .to_request();

        let resp: HealthResponse = test::read_response_json(&mut app, req).await;
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.records, 6);
        assert!(resp.loaded_at.is_some());
    }

    #[actix_rt::test]
    async fn test_cors_header_is_set() {
        let mut app = test::init_service(
            App::new()
                .data(empty_state())
                .wrap(api::cors_headers())
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .to_request();

        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[actix_rt::test]
    async fn test_value_estimate_for_known_suburb() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(CannedSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/value-estimate?suburb=testville&state=ts&type=House&beds=3")
            .to_request();

        let resp: EstimateResponse = test::read_response_json(&mut app, req).await;
        assert!(resp.found_record);
        assert_eq!(resp.weekly_rent_used, 500.0);
        assert_eq!(resp.property_type, "house");
        assert_eq!(resp.bedrooms, Some(3));
        let factor = (1.0_f64 + 5.0 / 100.0).powi(5);
        assert_eq!(resp.projected_price_5yr, (resp.estimated as f64 * factor).round() as i64);
        assert_eq!(resp.summary, "testville looks promising.");
        assert_eq!(resp.summary_source, "ai");
    }

    #[actix_rt::test]
    async fn test_value_estimate_falls_back_when_summarizer_fails() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(FailingSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/value-estimate?suburb=Atlantis&state=VIC&beds=many&weekly_rent=")
            .to_request();

        let resp: EstimateResponse = test::read_response_json(&mut app, req).await;
        assert!(!resp.found_record);
        assert_eq!(resp.bedrooms, None);
        assert_eq!(resp.weekly_rent_used, 480.0);
        assert_eq!(resp.summary_source, "local");
        assert!(resp.summary.starts_with("Atlantis, VIC: estimated value $"));
    }

    #[actix_rt::test]
    async fn test_value_estimate_without_parameters() {
        let mut app = test::init_service(
            App::new()
                .data(empty_state())
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/value-estimate")
            .to_request();

        let resp: EstimateResponse = test::read_response_json(&mut app, req).await;
        assert_eq!(resp.suburb, "Sydney");
        assert_eq!(resp.state, "NSW");
        assert!(!resp.found_record);
        assert!(resp.estimated > 0);
        assert_eq!(resp.summary_source, "local");
    }

    #[actix_rt::test]
    async fn test_top_suburbs_by_yield() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(LocalSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/top-suburbs?state=VIC&budget=800000&goal=yield")
            .to_request();

        let resp: Value = test::read_response_json(&mut app, req).await;
        assert_eq!(resp["status"], "ok");
        assert_eq!(resp["count"], 3);

        let results = resp["results"].as_array().unwrap();
        let names: Vec<&str> = results.iter().map(|r| r["suburb"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Werribee", "Sunshine", "Footscray"]);
        for result in results {
            assert_eq!(result["state"], "VIC");
            assert!(result["median_price"].as_f64().unwrap() <= 800000.0);
            assert!(result["score_est"].as_f64().unwrap() > 0.0);
        }
    }

    #[actix_rt::test]
    async fn test_top_suburbs_by_growth_with_limit() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(LocalSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/top-suburbs?goal=growth&limit=2")
            .to_request();

        let resp: Value = test::read_response_json(&mut app, req).await;
        let names: Vec<&str> = resp["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["suburb"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Blacktown", "Sunshine"]);
    }

    #[actix_rt::test]
    async fn test_top_suburbs_no_candidates_and_no_data() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(LocalSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/top-suburbs?budget=1000")
            .to_request();

        let resp: Value = test::read_response_json(&mut app, req).await;
        assert_eq!(resp["status"], "no_candidates");
        assert_eq!(resp["count"], 0);
        assert_eq!(resp["results"], json!([]));

        let mut app = test::init_service(
            App::new()
                .data(empty_state())
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/top-suburbs")
            .to_request();

        let resp: Value = test::read_response_json(&mut app, req).await;
        assert_eq!(resp["status"], "no_data");
    }

    #[actix_rt::test]
    async fn test_analyze_with_summarizer() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(CannedSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .set_json(&json!({ "suburb": "Hobart", "state": "TAS" }))
            .to_request();

        let resp: Value = test::read_response_json(&mut app, req).await;
        assert_eq!(resp["summary"], "Hobart looks promising.");
    }

    #[actix_rt::test]
    async fn test_analyze_reports_unavailable_summarizer() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(FailingSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/analyze")
            .set_json(&json!({}))
            .to_request();

        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_rt::test]
    async fn test_failed_reload_keeps_data() {
        let mut app = test::init_service(
            App::new()
                .data(app_state(Arc::new(LocalSummarizer)))
                .configure(api::routes)
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/reload")
            .to_request();

        let resp = app.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let req = test::TestRequest::get()
            .uri("/health")
            .to_request();

        let resp: HealthResponse = test::read_response_json(&mut app, req).await;
        assert_eq!(resp.records, 6);
    }
}
