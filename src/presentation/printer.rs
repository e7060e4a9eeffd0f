use colored::Colorize;
use hyper::header::HeaderMap;

/// Emphasis levels for console output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    ModuleTitle,
    Header1,
    Header2,
    Hint,
    NormalText,
}

pub fn print(text: &str, level: HeadingLevel) {
    match level {
        HeadingLevel::ModuleTitle => {
            println!("\n{}\n", format!("===== {} =====", text.to_uppercase()).bright_blue().bold())
        }
        HeadingLevel::Header1 => println!("\n{}", text.magenta().bold()),
        HeadingLevel::Header2 => println!("\n{}", text.cyan()),
        HeadingLevel::Hint => println!("\n{}", format!("* Hint: {} *", text).yellow()),
        HeadingLevel::NormalText => println!("{}", text.white()),
    }
}

pub fn title() -> &'static str {
    r#"
  _   _  ____
 | | | |/ ___|
 | |_| | |
 |  _  | |___
 |_| |_|\____|
"#
}

/// `Name: v1 v2` lines sorted by header name; repeated names are joined.
pub fn format_headers<'a>(headers: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<String> {
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
    for (name, value) in headers {
        match grouped.iter_mut().find(|(seen, _)| seen.eq_ignore_ascii_case(name)) {
            Some((_, values)) => values.push(value),
            None => grouped.push((name, vec![value])),
        }
    }
    grouped.sort_by(|(a, _), (b, _)| a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()));
    grouped
        .into_iter()
        .map(|(name, values)| format!("{}: {}", name, values.join(" ")))
        .collect()
}

pub fn header_pair_lines(headers: &[(String, String)]) -> Vec<String> {
    format_headers(headers.iter().map(|(k, v)| (k.as_str(), v.as_str())))
}

pub fn header_map_lines(headers: &HeaderMap) -> Vec<String> {
    format_headers(
        headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.to_str().unwrap_or("<binary>"))),
    )
}

/// A block of output prepared ahead of printing.
pub type Lines = Vec<(HeadingLevel, String)>;

pub fn print_lines(lines: &Lines) {
    for (level, text) in lines {
        print(text, *level);
    }
}
