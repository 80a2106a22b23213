use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub level_context: String,
    #[serde(default)]
    pub vocab_context: String,
}

/// One token of the tutor's Japanese reply. `reading` is phonetic
/// script (hiragana/katakana); `explanation` is present for particle
/// and grammar tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorSegment {
    pub text: String,
    pub reading: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub function: String,
}

/// The fixed JSON contract the tutor model is asked to produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorResponse {
    pub segments: Vec<TutorSegment>,
    pub english: String,
    pub grammar_point: String,
}

fn needs_explanation(function: &str) -> bool {
    let f = function.to_ascii_lowercase();
    f.contains("particle") || f.contains("grammar")
}

impl TutorResponse {
    /// Schema conformance beyond what serde checks: particle/grammar
    /// segments must carry a non-empty explanation.
    pub fn check_conformance(&self) -> Result<(), String> {
        for seg in &self.segments {
            if needs_explanation(&seg.function)
                && seg.explanation.as_deref().map_or(true, str::is_empty)
            {
                return Err(format!(
                    "segment '{}' has function '{}' but no explanation",
                    seg.text, seg.function
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noun(text: &str) -> TutorSegment {
        TutorSegment {
            text: text.into(),
            reading: "よみ".into(),
            meaning: "meaning".into(),
            explanation: None,
            function: "noun".into(),
        }
    }

    #[test]
    fn parses_the_documented_shape() {
        let raw = r#"{
            "segments": [
                { "text": "猫", "reading": "ねこ", "meaning": "cat", "function": "noun" },
                { "text": "が", "reading": "が", "meaning": "(subject)", "explanation": "marks the subject", "function": "particle" }
            ],
            "english": "The cat.",
            "grammar_point": "が marks the subject."
        }"#;
        let resp: TutorResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.segments.len(), 2);
        assert!(resp.check_conformance().is_ok());
    }

    #[test]
    fn particle_without_explanation_fails_conformance() {
        let resp = TutorResponse {
            segments: vec![TutorSegment {
                text: "は".into(),
                reading: "は".into(),
                meaning: "(topic)".into(),
                explanation: None,
                function: "PARTICLE".into(),
            }],
            english: String::new(),
            grammar_point: String::new(),
        };
        let err = resp.check_conformance().unwrap_err();
        assert!(err.contains("は"));
    }

    #[test]
    fn empty_explanation_counts_as_missing() {
        let resp = TutorResponse {
            segments: vec![TutorSegment {
                explanation: Some(String::new()),
                function: "grammar".into(),
                ..noun("です")
            }],
            english: String::new(),
            grammar_point: String::new(),
        };
        assert!(resp.check_conformance().is_err());
    }

    #[test]
    fn plain_tokens_need_no_explanation() {
        let resp = TutorResponse {
            segments: vec![noun("猫"), noun("水")],
            english: "e".into(),
            grammar_point: "g".into(),
        };
        assert!(resp.check_conformance().is_ok());
    }

    #[test]
    fn absent_explanation_is_omitted_from_json() {
        let json = serde_json::to_value(noun("猫")).unwrap();
        assert!(json.get("explanation").is_none());
    }
}
