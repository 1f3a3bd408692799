//! Pluggable scoring backends
//!
//! A backend turns (candidate text, job description, criterion) into a
//! bounded [`CriterionScore`] with a human-readable justification. Backends
//! are versioned so a batch can record what produced its numbers, and they
//! must be deterministic: identical inputs against the same backend version
//! yield identical scores.

use crate::error::{Result, ScreenerError};
use crate::scoring::criterion::{CriterionKey, CriterionScore};
use aho_corasick::AhoCorasick;
use regex::Regex;
use std::collections::BTreeSet;
use strsim::jaro_winkler;
use unicode_segmentation::UnicodeSegmentation;

/// Fuzzy-match acceptance threshold for lexicon terms ("kubernets" still
/// counts as kubernetes).
const FUZZY_THRESHOLD: f64 = 0.88;

pub trait ScoringBackend: Send + Sync {
    /// Stable identifier of the backend implementation and its revision.
    fn version(&self) -> &str;

    /// Score one criterion of one candidate against the job description.
    fn score_criterion(
        &self,
        candidate_text: &str,
        job_description: &str,
        criterion: CriterionKey,
    ) -> impl std::future::Future<Output = Result<CriterionScore>> + Send;
}

/// Default backend: lexicon overlap between the job description and the
/// candidate text, with fuzzy matching for near-miss spellings. Pure CPU
/// work with no randomness, so scores reproduce run over run.
pub struct KeywordBackend {
    experience: CriterionLexicon,
    skills: CriterionLexicon,
    education: CriterionLexicon,
    languages: CriterionLexicon,
    strengths: CriterionLexicon,
    years_pattern: Regex,
}

struct CriterionLexicon {
    matcher: AhoCorasick,
    terms: Vec<String>,
}

impl CriterionLexicon {
    fn build(terms: &[&str]) -> Result<Self> {
        let mut terms: Vec<String> = terms.iter().map(|s| s.to_string()).collect();
        // Longest first so "machine learning" wins over "learning"
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(aho_corasick::MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| ScreenerError::Backend(format!("failed to build lexicon: {}", e)))?;
        Ok(Self { matcher, terms })
    }

    /// Unique lexicon terms present in `text`, in lexicon order.
    fn hits(&self, text: &str) -> Vec<String> {
        let mut seen = BTreeSet::new();
        for mat in self.matcher.find_iter(text) {
            seen.insert(mat.pattern().as_usize());
        }
        seen.into_iter().map(|i| self.terms[i].clone()).collect()
    }
}

impl KeywordBackend {
    pub fn new() -> Result<Self> {
        Ok(Self {
            experience: CriterionLexicon::build(&[
                "experience", "senior", "lead", "led", "managed", "architect", "delivered",
                "production", "shipped", "maintained", "built", "migration", "on-call",
            ])?,
            skills: CriterionLexicon::build(&[
                "python", "java", "javascript", "typescript", "rust", "kotlin", "c++", "sql",
                "docker", "kubernetes", "aws", "azure", "gcp", "react", "node.js", "spring",
                "django", "terraform", "linux", "git", "microservices", "rest", "graphql",
                "kafka", "redis", "postgresql", "mongodb", "etl", "spark", "machine learning",
                "ci/cd", "scrum", "agile",
            ])?,
            education: CriterionLexicon::build(&[
                "degree", "bachelor", "master", "phd", "doctorate", "university", "college",
                "graduate", "postgraduate", "bsc", "msc", "mba", "computer science",
                "information systems", "engineering", "certification",
            ])?,
            languages: CriterionLexicon::build(&[
                "english", "portuguese", "spanish", "french", "german", "mandarin", "japanese",
                "fluent", "native", "bilingual", "toefl", "ielts",
            ])?,
            strengths: CriterionLexicon::build(&[
                "leadership", "communication", "proactive", "teamwork", "mentoring",
                "ownership", "problem solving", "collaboration", "adaptability", "initiative",
                "open-source", "autonomy",
            ])?,
            years_pattern: Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:years?|anos?)")
                .map_err(|e| ScreenerError::Backend(format!("invalid years pattern: {}", e)))?,
        })
    }

    fn lexicon(&self, criterion: CriterionKey) -> &CriterionLexicon {
        match criterion {
            CriterionKey::Experience => &self.experience,
            CriterionKey::Skills => &self.skills,
            CriterionKey::Education => &self.education,
            CriterionKey::Languages => &self.languages,
            CriterionKey::Strengths => &self.strengths,
            // The penalty criterion is scored against the skills the
            // posting asks for, see score_weaknesses.
            CriterionKey::Weaknesses => &self.skills,
        }
    }

    /// Terms the role cares about for this criterion: lexicon hits in the
    /// job description, or the whole lexicon when the posting is silent.
    fn relevant_terms(&self, criterion: CriterionKey, job_description: &str) -> Vec<String> {
        let lexicon = self.lexicon(criterion);
        let from_job = lexicon.hits(job_description);
        if from_job.is_empty() {
            lexicon.terms.clone()
        } else {
            from_job
        }
    }

    /// Splits `relevant` into terms the candidate covers (exactly or
    /// fuzzily) and terms they do not.
    fn coverage(
        &self,
        criterion: CriterionKey,
        candidate_text: &str,
        relevant: &[String],
    ) -> (Vec<String>, Vec<String>) {
        let exact: BTreeSet<String> = self
            .lexicon(criterion)
            .hits(candidate_text)
            .into_iter()
            .collect();
        let tokens: Vec<String> = candidate_text
            .unicode_words()
            .filter(|w| w.len() >= 3)
            .map(|w| w.to_lowercase())
            .collect();

        let mut matched = Vec::new();
        let mut missing = Vec::new();
        for term in relevant {
            if exact.contains(term) {
                matched.push(term.clone());
            } else if tokens
                .iter()
                .any(|t| jaro_winkler(t, &term.to_lowercase()) >= FUZZY_THRESHOLD)
            {
                matched.push(term.clone());
            } else {
                missing.push(term.clone());
            }
        }
        (matched, missing)
    }

    fn score_positive(
        &self,
        criterion: CriterionKey,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<CriterionScore> {
        let relevant = self.relevant_terms(criterion, job_description);
        let (matched, _missing) = self.coverage(criterion, candidate_text, &relevant);
        let mut ratio = matched.len() as f32 / relevant.len() as f32;

        // Stated years of experience sharpen the experience score beyond
        // bare keyword overlap.
        if criterion == CriterionKey::Experience {
            let years = self
                .years_pattern
                .captures_iter(candidate_text)
                .filter_map(|c| c[1].parse::<u32>().ok())
                .max()
                .unwrap_or(0);
            let years_factor = (years as f32 / 10.0).min(1.0);
            ratio = 0.6 * ratio + 0.4 * years_factor;
        }

        let value = round1(10.0 * ratio.clamp(0.0, 1.0));
        let justification = if matched.is_empty() {
            format!(
                "No {} evidence matching the posting was found in the document",
                criterion
            )
        } else {
            format!(
                "Covers {} of {} {} signals relevant to the posting: {}",
                matched.len(),
                relevant.len(),
                criterion,
                matched.join(", ")
            )
        };
        CriterionScore::new(criterion, value, justification)
    }

    /// Weaknesses are the posting's skill requirements the candidate shows
    /// no evidence of. Scored on the negative penalty range.
    fn score_weaknesses(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<CriterionScore> {
        let required = self.skills.hits(job_description);
        if required.is_empty() {
            return CriterionScore::new(
                CriterionKey::Weaknesses,
                0.0,
                "The posting names no specific skills to hold against the candidate".to_string(),
            );
        }
        let (_matched, missing) = self.coverage(CriterionKey::Skills, candidate_text, &required);
        let ratio = missing.len() as f32 / required.len() as f32;
        let value = round1(-3.0 * ratio);
        let justification = if missing.is_empty() {
            "Every skill the posting asks for has supporting evidence".to_string()
        } else {
            format!(
                "No evidence for {} of {} required skills: {}",
                missing.len(),
                required.len(),
                missing.join(", ")
            )
        };
        CriterionScore::new(CriterionKey::Weaknesses, value, justification)
    }
}

impl ScoringBackend for KeywordBackend {
    fn version(&self) -> &str {
        "keyword-overlap/1.0"
    }

    async fn score_criterion(
        &self,
        candidate_text: &str,
        job_description: &str,
        criterion: CriterionKey,
    ) -> Result<CriterionScore> {
        if candidate_text.trim().is_empty() {
            return Err(ScreenerError::ExtractionEmpty);
        }
        if job_description.trim().is_empty() {
            return Err(ScreenerError::InvalidInput(
                "job description must not be empty".to_string(),
            ));
        }

        if criterion.is_penalty() {
            self.score_weaknesses(candidate_text, job_description)
        } else {
            self.score_positive(criterion, candidate_text, job_description)
        }
    }
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = "Senior Java developer with AWS, Docker and SQL. \
                       Kubernetes is a plus. Fluent English required.";
    const CV: &str = "Java developer, 5 years of experience. Worked with SQL, \
                      Docker and AWS in production. Fluent English.";

    #[tokio::test]
    async fn scores_are_deterministic() {
        let backend = KeywordBackend::new().unwrap();
        for criterion in CriterionKey::ALL {
            let first = backend.score_criterion(CV, JOB, criterion).await.unwrap();
            let second = backend.score_criterion(CV, JOB, criterion).await.unwrap();
            assert_eq!(first, second, "criterion {} not reproducible", criterion);
        }
    }

    #[tokio::test]
    async fn values_stay_in_declared_ranges() {
        let backend = KeywordBackend::new().unwrap();
        for criterion in CriterionKey::ALL {
            let score = backend.score_criterion(CV, JOB, criterion).await.unwrap();
            let (min, max) = criterion.range();
            assert!(
                score.value >= min && score.value <= max,
                "{} = {} outside [{}, {}]",
                criterion,
                score.value,
                min,
                max
            );
            assert!(!score.justification.trim().is_empty());
        }
    }

    #[tokio::test]
    async fn empty_candidate_text_is_rejected() {
        let backend = KeywordBackend::new().unwrap();
        let result = backend
            .score_criterion("   ", JOB, CriterionKey::Skills)
            .await;
        assert!(matches!(result, Err(ScreenerError::ExtractionEmpty)));
    }

    #[tokio::test]
    async fn empty_job_description_is_rejected() {
        let backend = KeywordBackend::new().unwrap();
        let result = backend.score_criterion(CV, "", CriterionKey::Skills).await;
        assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn missing_required_skill_shows_up_as_weakness() {
        let backend = KeywordBackend::new().unwrap();
        let score = backend
            .score_criterion(CV, JOB, CriterionKey::Weaknesses)
            .await
            .unwrap();
        // Kubernetes is required by the posting and absent from the CV
        assert!(score.value < 0.0);
        assert!(score.justification.contains("kubernetes"));
    }

    #[tokio::test]
    async fn fuzzy_match_credits_near_miss_spelling() {
        let backend = KeywordBackend::new().unwrap();
        let cv = "Ten years with Jaava and Dockerr in production, fluent English.";
        let score = backend
            .score_criterion(cv, JOB, CriterionKey::Skills)
            .await
            .unwrap();
        assert!(score.value > 0.0);
    }
}
