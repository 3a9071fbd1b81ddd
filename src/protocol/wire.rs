//! Text messages exchanged with the decision service.
//!
//! A request is one line: `tag|s0|s1|...|sK`, where each section is a
//! comma-joined run of integers. Section count and lengths are fixed per
//! decision type, so the service splits on `|` and `,` without any schema
//! negotiation.
//!
//! Example (trade): `trade|4|5|1,2,0,0,0|0,0,3,1,0|0,1,0,0,0|0,0,1,0,0`

use std::fmt;

use crate::features::FeatureVector;

/// Decision type carried in the first field of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionTag {
    Robber,
    Trade,
}

impl DecisionTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            DecisionTag::Robber => "robber",
            DecisionTag::Trade => "trade",
        }
    }

    pub fn from_name(s: &str) -> Option<DecisionTag> {
        match s {
            "robber" => Some(DecisionTag::Robber),
            "trade" => Some(DecisionTag::Trade),
            _ => None,
        }
    }
}

impl fmt::Display for DecisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from building or reading a wire message.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("section lengths sum to {expected} but the vector has {actual} values")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("section {0} is empty")]
    EmptySection(usize),

    #[error("unknown decision tag: '{0}'")]
    UnknownTag(String),

    #[error("expected {expected} sections, got {actual}")]
    SectionCount { expected: usize, actual: usize },

    #[error("section {section} has {actual} values, expected {expected}")]
    SectionLength {
        section: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid integer in section {section}: '{token}'")]
    InvalidInteger { section: usize, token: String },
}

/// A formatted request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMessage {
    tag: DecisionTag,
    line: String,
}

impl WireMessage {
    pub fn tag(&self) -> DecisionTag {
        self.tag
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn into_string(self) -> String {
        self.line
    }
}

impl fmt::Display for WireMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Formats `values` split into sections of `segment_lengths`.
pub fn format(
    tag: DecisionTag,
    values: &[i32],
    segment_lengths: &[usize],
) -> Result<WireMessage, WireError> {
    let expected: usize = segment_lengths.iter().sum();
    if expected != values.len() {
        return Err(WireError::LengthMismatch {
            expected,
            actual: values.len(),
        });
    }
    if let Some(i) = segment_lengths.iter().position(|&l| l == 0) {
        return Err(WireError::EmptySection(i));
    }

    let mut line = String::with_capacity(tag.as_str().len() + values.len() * 3);
    line.push_str(tag.as_str());
    let mut start = 0;
    for &len in segment_lengths {
        line.push('|');
        for (i, v) in values[start..start + len].iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&v.to_string());
        }
        start += len;
    }
    Ok(WireMessage { tag, line })
}

/// Formats an encoded feature vector with its own section lengths.
pub fn format_features(tag: DecisionTag, fv: &FeatureVector) -> Result<WireMessage, WireError> {
    format(tag, fv.values(), fv.segment_lengths())
}

/// Parses a request line, checking every section against `segment_lengths`.
pub fn parse(line: &str, segment_lengths: &[usize]) -> Result<(DecisionTag, Vec<i32>), WireError> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('|');
    let tag_str = fields.next().unwrap_or("");
    let tag =
        DecisionTag::from_name(tag_str).ok_or_else(|| WireError::UnknownTag(tag_str.to_string()))?;

    let sections: Vec<&str> = fields.collect();
    if sections.len() != segment_lengths.len() {
        return Err(WireError::SectionCount {
            expected: segment_lengths.len(),
            actual: sections.len(),
        });
    }

    let mut values = Vec::with_capacity(segment_lengths.iter().sum());
    for (section, (text, &expected)) in sections.iter().zip(segment_lengths).enumerate() {
        let tokens: Vec<&str> = text.split(',').collect();
        if tokens.len() != expected {
            return Err(WireError::SectionLength {
                section,
                expected,
                actual: tokens.len(),
            });
        }
        for token in tokens {
            let v = token
                .trim()
                .parse::<i32>()
                .map_err(|_| WireError::InvalidInteger {
                    section,
                    token: token.to_string(),
                })?;
            values.push(v);
        }
    }
    Ok((tag, values))
}
