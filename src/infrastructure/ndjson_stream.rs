// Chunked newline-delimited JSON streaming of sensor updates
use crate::application::sensor_feed::SensorUpdate;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Create a chunked NDJSON streaming response
pub fn ndjson_stream<S>(stream: S) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = SensorUpdate> + Send + 'static,
{
    let byte_stream = stream.map(|update| serialize_line(&update));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Serialize a single update as one JSON line
pub fn serialize_line(update: &SensorUpdate) -> Result<Bytes, std::io::Error> {
    let json = serde_json::to_vec(update)?;
    let mut line = BytesMut::with_capacity(json.len() + 1);
    line.put_slice(&json);
    line.put_u8(b'\n');
    Ok(line.freeze())
}

/// Adapt a broadcast receiver, skipping over updates a slow client missed
pub fn updates_from_receiver(
    rx: broadcast::Receiver<SensorUpdate>,
) -> impl Stream<Item = SensorUpdate> + Send + 'static {
    BroadcastStream::new(rx).filter_map(|item| async move {
        match item {
            Ok(update) => Some(update),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "sensor stream client lagged");
                None
            }
        }
    })
}

pub fn stream_from_receiver(rx: broadcast::Receiver<SensorUpdate>) -> impl IntoResponse {
    match ndjson_stream(updates_from_receiver(rx)) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::fixtures::sample;
    use crate::domain::sensor::AnomalyReport;

    fn update(ph: f64) -> SensorUpdate {
        SensorUpdate {
            sample: sample(ph, 6.0, 20.0),
            anomaly: AnomalyReport::normal(),
        }
    }

    #[test]
    fn test_serialize_line() {
        let line = serialize_line(&update(7.0)).unwrap();
        assert_eq!(line.last(), Some(&b'\n'));
        let parsed: serde_json::Value = serde_json::from_slice(&line[..line.len() - 1]).unwrap();
        assert_eq!(parsed["sample"]["ph"], 7.0);
        assert_eq!(parsed["anomaly"]["isAnomaly"], false);
    }

    #[tokio::test]
    async fn test_lagged_updates_are_skipped() {
        let (tx, rx) = broadcast::channel(2);
        for ph in [6.0, 6.5, 7.0, 7.5] {
            tx.send(update(ph)).unwrap();
        }
        drop(tx);

        let received: Vec<f64> = updates_from_receiver(rx)
            .map(|u| u.sample.ph)
            .collect()
            .await;
        assert_eq!(received, vec![7.0, 7.5]);
    }
}
