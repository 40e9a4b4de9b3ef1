//! Share snapshot and its URL token codec.
//!
//! Token format: standard base64 of the camelCase JSON object
//! `{"totalResponses":..,"positiveImpact":..,"neutralImpact":..,"negativeImpact":..}`.

use crate::analytics::ImpactDistribution;
use base64::{engine::general_purpose, Engine as _};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query parameter carrying the token.
pub const SHARE_QUERY_PARAM: &str = "share";

/// Point-in-time copy of the headline counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareSnapshot {
    pub total_responses: u64,
    pub positive_impact: u64,
    pub neutral_impact: u64,
    pub negative_impact: u64,
}

impl ShareSnapshot {
    pub fn from_distribution(total_responses: u64, clarity: &ImpactDistribution) -> Self {
        Self {
            total_responses,
            positive_impact: clarity.positive,
            neutral_impact: clarity.neutral,
            negative_impact: clarity.negative,
        }
    }
}

pub fn encode_share_token(snapshot: &ShareSnapshot) -> String {
    let json = serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string());
    general_purpose::STANDARD.encode(json)
}

/// Decodes a token produced by `encode_share_token`.
///
/// Returns `None` when the token is not base64, not JSON, or not a JSON
/// object. Individual fields are coerced to counts and default to 0.
pub fn decode_share_token(token: &str) -> Option<ShareSnapshot> {
    let token = token.trim();
    let bytes = general_purpose::STANDARD
        .decode(token)
        .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(token.trim_end_matches('=')))
        .map_err(|err| {
            warn!("event=share_decode module=share status=error reason=base64 error={err}");
        })
        .ok()?;

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|err| {
            warn!("event=share_decode module=share status=error reason=json error={err}");
        })
        .ok()?;

    let Value::Object(fields) = value else {
        warn!("event=share_decode module=share status=error reason=not_object");
        return None;
    };

    let field = |name: &str| fields.get(name).map_or(0, coerce_count);
    Some(ShareSnapshot {
        total_responses: field("totalResponses"),
        positive_impact: field("positiveImpact"),
        neutral_impact: field("neutralImpact"),
        negative_impact: field("negativeImpact"),
    })
}

/// Appends the share token to `base_url` as a query parameter.
pub fn build_share_url(base_url: &str, snapshot: &ShareSnapshot) -> String {
    let base = base_url.split('#').next().unwrap_or(base_url);
    let separator = if !base.contains('?') {
        "?"
    } else if base.ends_with('?') || base.ends_with('&') {
        ""
    } else {
        "&"
    };
    format!(
        "{base}{separator}{SHARE_QUERY_PARAM}={}",
        urlencoding::encode(&encode_share_token(snapshot))
    )
}

/// Extracts the percent-decoded `share` token from a URL's query string.
///
/// Only the query before any `#fragment` is searched.
pub fn share_token_from_url(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (_, query) = without_fragment.split_once('?')?;
    let (_, raw) = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SHARE_QUERY_PARAM)?;

    let token = urlencoding::decode(raw)
        .map_err(|err| {
            warn!(
                "event=share_decode module=share status=error reason=percent_encoding error={}",
                err
            );
        })
        .ok()?;
    Some(token.into_owned()).filter(|token| !token.is_empty())
}

/// Decodes the snapshot carried by a share URL, if any.
pub fn snapshot_from_url(url: &str) -> Option<ShareSnapshot> {
    share_token_from_url(url).and_then(|token| decode_share_token(&token))
}

fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().and_then(float_to_count))
            .unwrap_or(0),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(float_to_count))
                .unwrap_or(0)
        }
        Value::Bool(true) => 1,
        _ => 0,
    }
}

fn float_to_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value <= u64::MAX as f64 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}
