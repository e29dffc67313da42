// src/activate.rs
//
// Simulated segment push. Nothing leaves the process: the call waits a moment and hands back
// a made-up reference id.

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use std::{fmt, str::FromStr, time::Duration};
use tracing::{info, instrument};

/// Simulated round-trip of a push.
pub const PUSH_DELAY: Duration = Duration::from_millis(1200);

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Demand-side platform receiving the segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Dsp {
    Ttd,
    Dv360,
}

impl Dsp {
    pub fn as_str(&self) -> &str {
        match self {
            Dsp::Ttd => "TTD",
            Dsp::Dv360 => "DV360",
        }
    }
}

impl FromStr for Dsp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ttd" => Ok(Dsp::Ttd),
            "dv360" => Ok(Dsp::Dv360),
            other => Err(format!("unknown DSP '{}' (expected TTD or DV360)", other)),
        }
    }
}

impl fmt::Display for Dsp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Channel {
    Ctv,
    Youtube,
    Olv,
    Display,
}

impl Channel {
    pub fn as_str(&self) -> &str {
        match self {
            Channel::Ctv => "CTV",
            Channel::Youtube => "Youtube",
            Channel::Olv => "OLV",
            Channel::Display => "Display",
        }
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ctv" => Ok(Channel::Ctv),
            "youtube" => Ok(Channel::Youtube),
            "olv" => Ok(Channel::Olv),
            "display" => Ok(Channel::Display),
            other => Err(format!(
                "unknown channel '{}' (expected CTV, Youtube, OLV or Display)",
                other
            )),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub dsp: Dsp,
    pub channel: Channel,
    pub advertiser: String,
    pub insertion_order_id: String,
}

/// Receipt for a simulated push.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    pub reference_id: String,
    pub request: ActivationRequest,
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// `DSP-<epoch millis, base36>-<6 random base36 chars>`, uppercased.
pub fn generate_reference_id<R: Rng>(now_millis: u64, rng: &mut R) -> String {
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("DSP-{}-{}", to_base36(now_millis), suffix).to_uppercase()
}

/// Pretend to push the segment, waiting `delay` before answering.
#[instrument(level = "info", skip(request), fields(dsp = %request.dsp, channel = %request.channel))]
pub async fn push_segment(request: ActivationRequest, delay: Duration) -> Activation {
    tokio::time::sleep(delay).await;
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let reference_id = generate_reference_id(now, &mut rand::thread_rng());
    info!(reference_id = %reference_id, "segment pushed");
    Activation {
        reference_id,
        request,
    }
}
