//! Apply for a card over the API, then receive the provider's webhooks for it.

use async_trait::async_trait;
use musewallet::musewallet_client::endpoints;
use musewallet::musewallet_webhooks::sign_payload;
use musewallet::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PKCS8: &str = include_str!("../musewallet-client/tests/fixtures/partner_pkcs8.pem");

#[derive(Default, Clone)]
struct Ledger(Arc<Mutex<Vec<(NotificationKind, Option<String>, Option<Decimal>)>>>);

#[async_trait]
impl NotificationListener for Ledger {
    async fn on_notification(
        &self,
        notification: &Notification,
    ) -> musewallet::musewallet_webhooks::Result<()> {
        tracing::info!(kind = %notification.kind(), "ledger entry");
        self.0
            .lock()
            .unwrap()
            .push((notification.kind(), notification.card_id(), notification.amount()));
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_apply_then_receive_webhooks() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(endpoints::CARD_APPLY))
        .and(body_partial_json(json!({"partner_id": "P", "sign_type": "RSA"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "200",
            "message": "success",
            "data": {"apply_id": "a-77", "request_id": "r1", "status": "APPLYING"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = MuseWalletConfig::builder()
        .base_url(server.uri())
        .partner_id("P")
        .private_key(PKCS8)
        .backoff_unit(Duration::from_millis(1))
        .webhook_secret("whsec")
        .build();

    let client = MuseWalletClient::new(config.clone()).unwrap();
    let application = client
        .apply_card(&ApplyCardRequest {
            user_id: "u1".into(),
            request_id: "r1".into(),
            card_product_id: "prod_basic".into(),
            card_level: "2".into(),
            phone_number: "5551234".into(),
            phone_area_code: "1".into(),
            embossed_name: Some("JANE DOE".into()),
        })
        .await
        .unwrap();
    assert_eq!(application.apply_id.as_deref(), Some("a-77"));

    let ledger = Ledger::default();
    let processor = WebhookProcessor::from_config(&config).on_any(ledger.clone());

    let audit = json!({"type": "APPLY_AUDIT", "data": {"apply_id": "a-77", "card_id": "c9", "status": "CARD_APPROVED"}});
    let top_up = json!({"type": "CARD_TOP_UP", "data": {"card_id": "c9", "amount": "100.00", "request_id": "t1"}});

    for payload in [&audit, &top_up] {
        let body = serde_json::to_vec(payload).unwrap();
        let signature = sign_payload("whsec", payload).unwrap();
        let processed = processor.handle(&body, &signature).await.unwrap();
        assert_eq!(processed.status, "processed");
    }

    let forged = serde_json::to_vec(&json!({"type": "CARD_TOP_UP", "data": {"amount": "1000000"}})).unwrap();
    let err = processor.handle(&forged, &sign_payload("whsec", &top_up).unwrap()).await.unwrap_err();
    assert!(matches!(err, WebhookError::SignatureInvalid(_)));

    let entries = ledger.0.lock().unwrap();
    assert_eq!(
        *entries,
        vec![
            (NotificationKind::ApplicationApproved, Some("c9".to_string()), None),
            (
                NotificationKind::TopUpCompleted,
                Some("c9".to_string()),
                Some(Decimal::new(10000, 2))
            ),
        ]
    );
}
