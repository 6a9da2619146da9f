use serde_json::Value;
use thiserror::Error;

pub const NO_RESPONSE: &str = "No response";
pub const INVALID_RESPONSE: &str = "Invalid response";

const TEXT_POINTER: &str = "/0/content/0/text";
/// Bubbles take at most this share of the screen width, in percent.
const BUBBLE_WIDTH_PERCENT: usize = 85;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("empty payload")]
    Empty,
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("payload has no reply text")]
    MissingText,
}

impl OutputError {
    pub fn placeholder(&self) -> &'static str {
        match self {
            OutputError::Empty | OutputError::MissingText => NO_RESPONSE,
            OutputError::Malformed(_) => INVALID_RESPONSE,
        }
    }
}

/// Pulls the reply text out of a response payload.
///
/// The backend stores the model output as a JSON document encoded into a
/// string, so the string is decoded a second time before reading
/// `[0].content[0].text`. Payloads that arrive already structured are read
/// directly.
pub fn decode_output(payload: &Value) -> Result<String, OutputError> {
    let decoded;
    let document = match payload {
        Value::Null => return Err(OutputError::Empty),
        Value::String(s) if s.is_empty() => return Err(OutputError::Empty),
        Value::String(s) => {
            decoded = serde_json::from_str::<Value>(s)?;
            &decoded
        }
        other => other,
    };

    document
        .pointer(TEXT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(OutputError::MissingText)
}

/// Reply text for display; never fails.
pub fn response_text(payload: &Value) -> String {
    decode_output(payload).unwrap_or_else(|e| e.placeholder().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ChatBubble {
    pub speaker: Speaker,
    pub body: String,
    /// Already formatted for display.
    pub timestamp: Option<String>,
    pub risk_score: Option<i64>,
    pub flagged: bool,
}

impl ChatBubble {
    pub fn user(body: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            speaker: Speaker::User,
            body: body.into(),
            timestamp,
            risk_score: None,
            flagged: false,
        }
    }

    pub fn assistant(
        body: impl Into<String>,
        timestamp: Option<String>,
        risk_score: i64,
        flagged: bool,
    ) -> Self {
        Self {
            speaker: Speaker::Assistant,
            body: body.into(),
            timestamp,
            risk_score: Some(risk_score),
            flagged,
        }
    }

    /// User bubbles hug the right edge of `width`, assistant bubbles the left.
    pub fn render(&self, width: usize) -> String {
        let bubble_width = (width * BUBBLE_WIDTH_PERCENT / 100).max(10);
        let marker = if self.flagged { "!! " } else { "" };
        let text_width = bubble_width.saturating_sub(marker.len()).max(1);

        let mut lines: Vec<String> = textwrap::wrap(&self.body, text_width)
            .into_iter()
            .map(|line| format!("{}{}", marker, line))
            .collect();
        if lines.is_empty() {
            lines.push(marker.trim_end().to_string());
        }

        let mut meta = Vec::new();
        meta.push(match self.speaker {
            Speaker::User => "You".to_string(),
            Speaker::Assistant => "Assistant".to_string(),
        });
        if let Some(ts) = &self.timestamp {
            meta.push(ts.clone());
        }
        if let Some(score) = self.risk_score {
            meta.push(format!("[risk {}]", score));
        }
        lines.push(meta.join("  "));

        let mut out = String::new();
        for line in lines {
            match self.speaker {
                Speaker::User => {
                    let pad = width.saturating_sub(line.chars().count());
                    out.push_str(&" ".repeat(pad));
                    out.push_str(&line);
                }
                Speaker::Assistant => out.push_str(&line),
            }
            out.push('\n');
        }
        out
    }
}
