//! Core types for the persona system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Persona
// ─────────────────────────────────────────────────────────────────

/// The expert roles offered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    /// Career coach specialised in moving into or within IT.
    CareerCoach,
    /// Blunt IT-industry hiring interviewer.
    Interviewer,
}

impl Persona {
    /// Label shown on the form and accepted as the lookup key.
    pub fn label(&self) -> &'static str {
        match self {
            Persona::CareerCoach => "キャリアコーチ（IT転職）",
            Persona::Interviewer => "面接官（採用人事・辛口）",
        }
    }

    /// ASCII alias used in CLI args and config.
    pub fn slug(&self) -> &'static str {
        match self {
            Persona::CareerCoach => "career-coach",
            Persona::Interviewer => "interviewer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Persona::CareerCoach => "Untangles worries, lays out options and trade-offs, ends with a short action plan",
            Persona::Interviewer => "Critiques strengths, weaknesses and concerns against hiring criteria",
        }
    }

    /// System prompt sent ahead of the user's text.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::CareerCoach => concat!(
                "あなたは思考の言語化が得意なプロのキャリアコーチです。",
                "受講者の不安や前提を丁寧にほどき、選択肢とトレードオフを並べ、",
                "短いアクションプランを提示してください。断定しすぎず、根拠も添えること。",
            ),
            Persona::Interviewer => concat!(
                "あなたはIT業界の採用担当者です。応募者の強み・弱み・懸念点を実務目線で指摘し、",
                "評価基準の観点（スキル適合・再現性・協働・学習性）で具体的にコメントし、",
                "改善提案を端的に示してください。オブラートは不要、ただし建設的に。",
            ),
        }
    }

    /// All personas in display order. The first one is the form default.
    pub fn all() -> &'static [Persona] {
        &[Persona::CareerCoach, Persona::Interviewer]
    }

    /// Exact match on the display label or the slug.
    pub fn from_key(key: &str) -> Option<Persona> {
        Persona::all()
            .iter()
            .copied()
            .find(|p| p.label() == key || p.slug() == key)
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Persona {
    type Err = String;

    /// Lenient parse for typed input: surrounding whitespace is ignored and
    /// slugs match case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Persona::all()
            .iter()
            .copied()
            .find(|p| p.label() == key || p.slug().eq_ignore_ascii_case(key))
            .ok_or_else(|| {
                format!(
                    "Unknown persona '{}'. Valid: {}",
                    s,
                    Persona::all()
                        .iter()
                        .map(|p| p.slug())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}
