use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use paracord::interaction::{
    webhook::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
    Reply, Webhook,
};

use crate::{client::AppContext, prelude::*};

type Hook = Arc<Webhook<AppContext>>;

pub fn router(webhook: Hook) -> Router {
    Router::new()
        .route("/", post(interactions))
        .route("/interactions", post(interactions))
        .route("/health", get(|| async { "OK" }))
        .with_state(webhook)
}

async fn interactions(State(webhook): State<Hook>, headers: HeaderMap, body: Bytes) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let reply = webhook
        .handle(header(SIGNATURE_HEADER), header(TIMESTAMP_HEADER), &body)
        .await;
    let status =
        StatusCode::from_u16(reply.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if matches!(reply, Reply::Unauthorized) {
        return (status, "Not Authorized").into_response();
    }

    match reply.into_body() {
        Ok(Some(body)) => (status, Json(body)).into_response(),
        Ok(None) => status.into_response(),
        Err(err) => {
            error!(%err, "Error serializing interaction response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Bytes},
        extract::State,
        http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
        response::Response,
    };
    use paracord::interaction::{
        fixture::{self, Signer},
        webhook::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
    };
    use serde_json::{json, Value};

    use super::interactions;
    use crate::client::{test_webhook, RecordingRest};

    const TIMESTAMP: &str = "1700000000";

    fn signed(signer: &Signer, body: &[u8]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, val) in [
            (SIGNATURE_HEADER, signer.sign(TIMESTAMP, body)),
            (TIMESTAMP_HEADER, TIMESTAMP.to_owned()),
        ] {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(&val).unwrap(),
            );
        }
        headers
    }

    async fn post(
        rest: &Arc<RecordingRest>,
        headers: HeaderMap,
        payload: &Value,
    ) -> (StatusCode, Bytes) {
        let webhook = Arc::new(test_webhook(&Signer::default(), Arc::clone(rest)));
        let res: Response = interactions(
            State(webhook),
            headers,
            Bytes::from(serde_json::to_vec(payload).unwrap()),
        )
        .await;

        let status = res.status();
        (status, to_bytes(res.into_body(), usize::MAX).await.unwrap())
    }

    async fn post_signed(payload: &Value) -> (StatusCode, Bytes) {
        let body = serde_json::to_vec(payload).unwrap();
        post(&Arc::default(), signed(&Signer::default(), &body), payload).await
    }

    fn voice_activity() -> Value {
        let id = fixture::VOICE_CHANNEL_ID;
        fixture::guild_command(
            "activity",
            json!([
                { "name": "channel", "type": 7, "value": id },
                { "name": "activity", "type": 3, "value": "youtube" },
            ]),
            fixture::resolved_channel(id, "Lounge", 2),
        )
    }

    #[tokio::test]
    async fn rejects_unsigned() {
        let rest = Arc::<RecordingRest>::default();
        let (status, body) = post(&rest, HeaderMap::new(), &voice_activity()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&body[..], b"Not Authorized");
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn rejects_foreign_signature() {
        let rest = Arc::<RecordingRest>::default();
        let payload = voice_activity();
        let body = serde_json::to_vec(&payload).unwrap();

        let (status, res) = post(&rest, signed(&Signer::new([9; 32]), &body), &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(&res[..], b"Not Authorized");
        assert!(rest.calls().is_empty());

        let (status, _) = post(&rest, signed(&Signer::default(), &body), &payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rest.calls().len(), 1);
    }

    #[tokio::test]
    async fn answers_ping() {
        let rest = Arc::<RecordingRest>::default();
        let payload = fixture::ping();
        let body = serde_json::to_vec(&payload).unwrap();
        let (status, body) = post(&rest, signed(&Signer::default(), &body), &payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], br#"{"type":1}"#);
        assert!(rest.calls().is_empty());
    }

    #[tokio::test]
    async fn answers_commands() {
        let (status, body) =
            post_signed(&fixture::guild_command("invite", json!([]), json!({}))).await;
        let res: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["type"], 4);
        assert_eq!(res["data"]["flags"], 64);

        let (status, body) =
            post_signed(&fixture::guild_command("nope", json!([]), json!({}))).await;
        let res: Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(res["data"]["content"], "Unhandled Command");
    }

    #[tokio::test]
    async fn direct_message_activity_is_silent() {
        let id = fixture::VOICE_CHANNEL_ID;
        let payload = fixture::dm_command(
            "activity",
            json!([
                { "name": "channel", "type": 7, "value": id },
                { "name": "activity", "type": 3, "value": "poker" },
            ]),
            fixture::resolved_channel(id, "Lounge", 2),
        );
        let (status, body) = post_signed(&payload).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let (status, _) = post_signed(&json!({ "hello": "world" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
