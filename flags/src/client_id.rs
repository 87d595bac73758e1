use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Request header carrying the caller's stable anonymous id.
pub const ANON_ID_HEADER: &str = "x-pt-anon-id";

const SUFFIX_LEN: usize = 6;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Returns the caller supplied id verbatim, or synthesises a fresh one.
///
/// A synthesised id is different on every call, so callers that do not send
/// their own id get an independent rollout decision per request. Clients that
/// need stable bucketing must send `X-PT-Anon-ID`.
pub fn resolve_client_id(header_value: Option<&str>) -> String {
    match header_value {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => synthesize_client_id(),
    }
}

fn synthesize_client_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();

    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();

    format!("anonymous_{millis}_{suffix}")
}
