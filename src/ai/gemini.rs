use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GeneratedPlan, MealPlanner, PlanDraft, PlanRequest, PlannerError};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Drafts plans through the Gemini `generateContent` endpoint.
pub struct GeminiPlanner {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiPlanner {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, PlannerError> {
        let request = GeminiRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                response_mime_type: "application/json",
            },
        };

        let url = format!("{}/models/{}:generateContent", API_BASE_URL, self.model);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PlannerError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlannerError::Request(e.to_string()))?;

        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_str::<GeminiResponse>(&body) {
                if let Some(err) = parsed.error {
                    return Err(PlannerError::Api(err.message));
                }
            }
            return Err(PlannerError::Api(format!("HTTP {}", status)));
        }

        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| PlannerError::Parse(e.to_string()))?;
        first_text(parsed)
    }
}

fn first_text(response: GeminiResponse) -> Result<String, PlannerError> {
    if let Some(err) = response.error {
        return Err(PlannerError::Api(err.message));
    }
    response
        .candidates
        .into_iter()
        .flatten()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or_else(|| PlannerError::Parse("no text in Gemini response".into()))
}

pub fn build_prompt(req: &PlanRequest) -> Result<String, PlannerError> {
    let foods =
        serde_json::to_string_pretty(&req.foods).map_err(|e| PlannerError::Parse(e.to_string()))?;
    let prefs = if req.profile.dietary_prefs.is_empty() {
        "none".to_string()
    } else {
        req.profile.dietary_prefs.join(", ")
    };
    let goals = req.profile.goals.as_deref().unwrap_or("maintain healthy");
    let bmi = req
        .profile
        .bmi
        .map(|b| format!("{:.2}", b))
        .unwrap_or_else(|| "unknown".into());

    Ok(format!(
        r#"You are a nutritionist AI.
Based on the user's profile and available foods, generate a meal plan for {days} day(s).

User Profile:
Dietary Preference: {prefs}
Goal: {goals}
BMI: {bmi}

Available Food Items (values are per reference_amount of reference_unit; other_units may also be used):
{foods}

Only use food ids from the list above and units that are either the reference_unit or one of other_units.
Format the output strictly as JSON:
{{
  "days": [
    {{
      "day": 1,
      "meals": [
        {{
          "meal": "Breakfast",
          "items": [
            {{"food_id": 1, "quantity": 100, "unit": "g"}}
          ]
        }}
      ]
    }}
  ]
}}"#,
        days = req.days,
    ))
}

/// Pull a JSON object out of model output: bare, fenced, or embedded in prose.
pub fn extract_json(text: &str) -> Result<&str, PlannerError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    if let Some(start) = text.find("```json") {
        let start = start + "```json".len();
        if let Some(end) = text[start..].find("```") {
            return Ok(text[start..start + end].trim());
        }
    }

    if let Some(start) = text.find("```") {
        let start = start + 3;
        let content_start = text[start..]
            .find('\n')
            .map(|i| start + i + 1)
            .unwrap_or(start);
        if let Some(end) = text[content_start..].find("```") {
            return Ok(text[content_start..content_start + end].trim());
        }
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return Ok(&text[start..=end]);
        }
    }

    Err(PlannerError::Parse("no JSON object in reply".into()))
}

pub fn parse_plan(text: &str) -> Result<GeneratedPlan, PlannerError> {
    let json = extract_json(text)?;
    serde_json::from_str(json).map_err(|e| {
        warn!(error = %e, "AI reply did not match plan shape");
        PlannerError::Parse(e.to_string())
    })
}

#[async_trait]
impl MealPlanner for GeminiPlanner {
    async fn draft(&self, req: &PlanRequest) -> Result<PlanDraft, PlannerError> {
        let prompt = build_prompt(req)?;
        debug!(model = %self.model, days = req.days, foods = req.foods.len(), "requesting meal plan");
        let reply = self.generate(&prompt).await?;
        let plan = parse_plan(&reply)?;
        Ok(PlanDraft { prompt, plan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CatalogLine, PlannerProfile};
    use rust_decimal::Decimal;

    const PLAN: &str = r#"{"days":[{"day":1,"meals":[{"meal":"Breakfast","items":[{"food_id":1,"quantity":2,"unit":"piece"}]}]}]}"#;

    #[test]
    fn extracts_bare_fenced_and_embedded_json() {
        assert_eq!(extract_json(PLAN).unwrap(), PLAN);
        let fenced = format!("Here you go:\n```json\n{}\n```\nEnjoy!", PLAN);
        assert_eq!(extract_json(&fenced).unwrap(), PLAN);
        let plain = format!("```\n{}\n```", PLAN);
        assert_eq!(extract_json(&plain).unwrap(), PLAN);
        let embedded = format!("The plan is {} as requested.", PLAN);
        assert_eq!(extract_json(&embedded).unwrap(), PLAN);
        assert!(extract_json("no plan today").is_err());
    }

    #[test]
    fn parses_plan_shape() {
        let plan = parse_plan(PLAN).unwrap();
        let item = &plan.days[0].meals[0].items[0];
        assert_eq!(item.food_id, 1);
        assert_eq!(item.quantity, Decimal::from(2));
        assert_eq!(item.unit, "piece");
        assert!(matches!(parse_plan(r#"{"days": "soon"}"#), Err(PlannerError::Parse(_))));
    }

    #[test]
    fn prompt_lists_profile_and_catalog() {
        let req = PlanRequest {
            profile: PlannerProfile {
                dietary_prefs: vec!["veg".into()],
                goals: Some("weight loss".into()),
                bmi: Some(22.857),
            },
            foods: vec![CatalogLine {
                id: 7,
                name: "Paneer".into(),
                calories: Decimal::from(265),
                protein: Decimal::from(18),
                carbs: Decimal::new(12, 1),
                fats: Decimal::from(21),
                reference_amount: Decimal::from(100),
                reference_unit: "g".into(),
                other_units: vec![],
            }],
            days: 3,
        };
        let prompt = build_prompt(&req).unwrap();
        assert!(prompt.contains("for 3 day(s)"));
        assert!(prompt.contains("Dietary Preference: veg"));
        assert!(prompt.contains("BMI: 22.86"));
        assert!(prompt.contains("\"Paneer\""));
    }

    #[test]
    fn candidate_text_or_api_error() {
        let ok: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(ok).unwrap(), "{}");

        let err: GeminiResponse =
            serde_json::from_str(r#"{"error":{"message":"quota exceeded"}}"#).unwrap();
        assert!(matches!(first_text(err), Err(PlannerError::Api(m)) if m == "quota exceeded"));
    }
}
