//! HTML pages for the three gate views
//!
//! Pages are askama templates with HTML auto-escaping; the only value
//! passed through `|safe` is the built-in stylesheet.

use askama::Template;
use gate_flow::{RenderSink, View};
use gate_puzzle::{CaptchaView, Cell, CellStyle};
use tracing::error;

/// Form field carrying the submitted coordinates
pub const ANSWER_FIELD: &str = "captcha_answer";

const STYLESHEET: &str = "\
body{font-family:sans-serif;max-width:40em;margin:2em auto;padding:0 1em}\
table.grid{border-collapse:collapse;margin:1em 0}\
table.grid th{padding:.3em .6em;color:#666;font-weight:normal}\
table.grid td{width:2.2em;height:2.2em;text-align:center;border:1px solid #ccc;\
font-weight:bold;font-size:1.3em}\
table.grid td span{display:inline-block;animation-name:hop;\
animation-iteration-count:infinite;animation-timing-function:ease-in-out}\
@keyframes hop{0%,100%{translate:0 0}50%{translate:0 -.25em}}\
.message{color:#b00020}\
.example{color:#444}";

/// Served if a template ever fails to render
const FALLBACK_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
<title>Error</title></head><body><p>Something went wrong. Please reload.</p></body></html>\n";

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta http-equiv="refresh" content="{{ refresh }};url=/">
<title>Queue</title>
<style>{{ stylesheet|safe }}</style>
</head>
<body>
<h1>You are in the queue</h1>
<p>Please wait. This page reloads by itself in about {{ seconds_remaining }} second{{ plural }}.</p>
</body>
</html>
"#,
    ext = "html"
)]
struct QueuePage {
    stylesheet: &'static str,
    refresh: i64,
    seconds_remaining: i64,
    plural: &'static str,
}

/// One grid cell, pre-formatted for the template
struct CellMarkup {
    letter: Option<char>,
    /// Tinted background from the cell's hue, saturation and lightness
    background: String,
    /// Rotation, colour and hop animation of the glyph
    glyph: String,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Verification</title>
<style>{{ stylesheet|safe }}</style>
</head>
<body>
<h1>Find the missing letter</h1>
<p class="instruction">{{ view.short_instruction }}</p>
<p>Every box next to the center of the cross holds the letter {{ view.game_letter }} except one.
Enter the coordinates of that box as column-row, from {{ view.min_coord }} to {{ view.max_coord }}.</p>
{% match view.message %}{% when Some with (message) %}<p class="message">{{ message }}</p>
{% when None %}{% endmatch %}
{% match view.example %}{% when Some with (example) %}<p class="example">Example: the letter {{ example.letter }}. {{ example.explanation }}</p>
{% when None %}{% endmatch %}
<table class="grid">
<tr><th></th>{% for col in columns %}<th scope="col">{{ col }}</th>{% endfor %}</tr>
{% for row in rows %}<tr><th scope="row">{{ loop.index }}</th>
{%- for cell in row -%}
{% match cell.letter %}{% when Some with (letter) %}<td style="{{ cell.background }}"><span style="{{ cell.glyph }}">{{ letter }}</span></td>{% when None %}<td style="{{ cell.background }}"></td>{% endmatch %}
{%- endfor %}</tr>
{% endfor %}</table>
<form method="post" action="/captcha">
<label for="{{ answer_field }}">Coordinates (column-row)</label>
<input id="{{ answer_field }}" name="{{ answer_field }}" type="text" autocomplete="off" autofocus required>
<button type="submit">Submit</button>
</form>
</body>
</html>
"#,
    ext = "html"
)]
struct CaptchaPage<'a> {
    stylesheet: &'static str,
    view: &'a CaptchaView,
    answer_field: &'static str,
    columns: Vec<usize>,
    rows: Vec<Vec<CellMarkup>>,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Assigned</title>
<style>{{ stylesheet|safe }}</style>
</head>
<body>
<h1>Verification complete</h1>
<p>You have been assigned. You may continue.</p>
</body>
</html>
"#,
    ext = "html"
)]
struct AssignPage {
    stylesheet: &'static str,
}

/// Renders views as complete HTML documents
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// A renderer with the built-in stylesheet
    pub fn new() -> Self {
        Self
    }

    fn try_render(view: &View) -> askama::Result<String> {
        match view {
            View::Queue { seconds_remaining } => QueuePage {
                stylesheet: STYLESHEET,
                // zero would reload in a tight loop
                refresh: (*seconds_remaining).max(1),
                seconds_remaining: *seconds_remaining,
                plural: if *seconds_remaining == 1 { "" } else { "s" },
            }
            .render(),
            View::Captcha(captcha) => CaptchaPage {
                stylesheet: STYLESHEET,
                view: captcha,
                answer_field: ANSWER_FIELD,
                columns: (1..=captcha.size).collect(),
                rows: captcha
                    .grid
                    .rows()
                    .map(|row| row.iter().map(CellMarkup::from_cell).collect())
                    .collect(),
            }
            .render(),
            View::Assign => AssignPage {
                stylesheet: STYLESHEET,
            }
            .render(),
        }
    }
}

impl RenderSink for HtmlRenderer {
    type Output = String;

    fn render(&self, view: &View) -> String {
        Self::try_render(view).unwrap_or_else(|e| {
            error!(error = %e, page = view.name(), "template render failed");
            FALLBACK_PAGE.to_string()
        })
    }
}

impl CellMarkup {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            letter: cell.letter,
            background: background_style(&cell.style),
            glyph: glyph_style(&cell.style),
        }
    }
}

/// Pale tint of the cell colour, three quarters of the way to white
fn background_style(style: &CellStyle) -> String {
    let lightness = style.lightness + (100.0 - style.lightness) * 0.75;
    format!(
        "background-color:hsl({:.1},{:.1}%,{:.1}%)",
        style.hue, style.saturation, lightness
    )
}

fn glyph_style(style: &CellStyle) -> String {
    format!(
        "rotate:{:.2}deg;color:hsl({:.1},{:.1}%,{:.1}%);animation-duration:{:.2}s;animation-delay:{:.2}s",
        style.rotation,
        style.hue,
        style.saturation,
        style.lightness,
        style.hop_duration,
        style.hop_delay
    )
}
