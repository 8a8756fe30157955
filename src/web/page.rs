//! HTML rendering for the single form page.

use std::fmt::Write;

use crate::persona::Persona;

const TITLE: &str = "転職支援アプリ";
const SUMMARY: &str = "転職に詳しい専門家を選んで回答を得るミニアプリ";
const USAGE: &str = "① 専門家を選ぶ　② 相談内容を入力　③ 送信";
const PERSONA_CAPTION: &str = "専門家の種類（振る舞い）を選択：";
const TEXT_CAPTION: &str = "相談内容 / 質問を入力（例：職務経歴を要約して、自己PRを作りたい）";
const PLACEHOLDER: &str = "ここにテキストを入力…";
const SUBMIT_LABEL: &str = "送信";
const ANSWER_HEADING: &str = "回答";
const NOTES: [&str; 3] = [
    "APIキーは .env または Streamlit Secrets（.streamlit/secrets.toml）に設定してください。",
    "APIキーをリポジトリにコミットしないでください。",
    "このアプリは学習用途。重要判断は自己責任で。",
];

/// What happened to the last submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Answer(String),
    Failure(String),
}

/// The form page, optionally carrying the outcome of a submission.
#[derive(Debug, Clone)]
pub struct PageView {
    selected: String,
    text: String,
    outcome: Option<Outcome>,
}

impl PageView {
    pub fn new(selected: &str, text: &str) -> Self {
        Self {
            selected: selected.to_string(),
            text: text.to_string(),
            outcome: None,
        }
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Selected radio option. Unknown labels leave every option unchecked.
    fn selected_persona(&self) -> Option<Persona> {
        Persona::from_key(&self.selected)
    }

    pub fn render(&self) -> String {
        let mut html = String::with_capacity(4096);
        let selected = self.selected_persona();

        html.push_str("<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{}</title>", TITLE);
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(html, "<h1>{}</h1>", TITLE);
        let _ = writeln!(html, "<p class=\"summary\">{}</p>", SUMMARY);
        let _ = writeln!(html, "<p class=\"usage\">{}</p>", USAGE);

        html.push_str("<form method=\"post\" action=\"/ask\">\n<fieldset>\n");
        let _ = writeln!(html, "<legend>{}</legend>", PERSONA_CAPTION);
        for &persona in Persona::all() {
            let _ = writeln!(
                html,
                "<label><input type=\"radio\" name=\"persona\" value=\"{}\"{}> {}</label>",
                escape(persona.label()),
                if Some(persona) == selected { " checked" } else { "" },
                escape(persona.label()),
            );
        }
        html.push_str("</fieldset>\n");

        let _ = writeln!(html, "<label for=\"text\">{}</label>", TEXT_CAPTION);
        let _ = writeln!(
            html,
            "<textarea id=\"text\" name=\"text\" rows=\"8\" placeholder=\"{}\">{}</textarea>",
            PLACEHOLDER,
            escape(&self.text),
        );
        let _ = writeln!(html, "<button type=\"submit\">{}</button>", SUBMIT_LABEL);
        html.push_str("</form>\n");

        match &self.outcome {
            Some(Outcome::Answer(text)) => {
                let _ = writeln!(html, "<h2>{}</h2>", ANSWER_HEADING);
                let _ = writeln!(html, "<div class=\"answer\">{}</div>", escape(text));
            }
            Some(Outcome::Failure(message)) => {
                let _ = writeln!(html, "<div class=\"error\">{}</div>", escape(message));
            }
            None => {}
        }

        html.push_str("<hr>\n<ul class=\"notes\">\n");
        for note in NOTES {
            let _ = writeln!(html, "<li>{}</li>", note);
        }
        html.push_str("</ul>\n</body>\n</html>\n");
        html
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
