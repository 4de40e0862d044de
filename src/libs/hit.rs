use crate::libs::error::{parse_field, AnchainError};
use crate::libs::interval::Span;
use anyhow::Context;
use std::io::BufRead;
use std::str::FromStr;

/// One line of tabular (blast8-like) aligner output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitRecord {
    pub query: String,
    pub subject: String,
    pub pct_identity: f64,
    pub align_len: u32,
    pub mismatches: u32,
    pub gaps: u32,
    pub q_start: i64,
    pub q_end: i64,
    pub s_start: i64,
    pub s_end: i64,
    pub e_value: f64,
    pub score: i64,
}

impl HitRecord {
    pub fn q_span(&self) -> Span {
        Span::new(self.q_start, self.q_end)
    }

    pub fn s_span(&self) -> Span {
        Span::new(self.s_start, self.s_end)
    }

    pub fn is_self_hit(&self) -> bool {
        self.query == self.subject
    }

    /// `query subject score e_value`, as written when hits are not combined
    pub fn score_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.query,
            self.subject,
            self.score,
            format_shortest(self.e_value)
        )
    }
}

impl FromStr for HitRecord {
    type Err = AnchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('\t').collect();
        if fields.len() != 12 {
            return Err(AnchainError::malformed(
                "hit",
                format!("expected 12 fields, found {}", fields.len()),
                s,
            ));
        }

        // aligners write the bit score as a float
        let score: f64 = parse_field("hit", "score", fields[11].trim(), s)?;

        Ok(HitRecord {
            query: fields[0].to_string(),
            subject: fields[1].to_string(),
            pct_identity: parse_field("hit", "identity", fields[2], s)?,
            align_len: parse_field("hit", "alignment length", fields[3], s)?,
            mismatches: parse_field("hit", "mismatches", fields[4], s)?,
            gaps: parse_field("hit", "gaps", fields[5], s)?,
            q_start: parse_field("hit", "query start", fields[6], s)?,
            q_end: parse_field("hit", "query end", fields[7], s)?,
            s_start: parse_field("hit", "subject start", fields[8], s)?,
            s_end: parse_field("hit", "subject end", fields[9], s)?,
            e_value: parse_field("hit", "e-value", fields[10], s)?,
            score: score.trunc() as i64,
        })
    }
}

/// Iterates hit records of a stream, in stream order.
///
/// Blank lines and `#` comments are skipped. The first malformed line ends
/// the stream with an error naming its line number.
pub struct HitReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> HitReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for HitReader<R> {
    type Item = anyhow::Result<HitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.lines.by_ref() {
            self.line_no += 1;
            let line = match line {
                Ok(l) => l,
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = self.line_no;
            return Some(
                line.parse::<HitRecord>()
                    .with_context(|| format!("line {}", line_no)),
            );
        }
        None
    }
}

/// Formats an e-value like C's `%.0e`: one significant digit and an exponent
/// of at least two digits.
///
/// ```
/// # use anchain::libs::hit::format_e_value;
/// assert_eq!(format_e_value(1e-13), "1e-13");
/// assert_eq!(format_e_value(0.0), "0e+00");
/// assert_eq!(format_e_value(3e-6), "3e-06");
/// assert_eq!(format_e_value(250.0), "2e+02");
/// assert_eq!(format_e_value(1.0), "1e+00");
/// ```
pub fn format_e_value(value: f64) -> String {
    let s = format!("{:.0e}", value);
    match s.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => s.clone(),
        },
        None => s,
    }
}

/// Formats a float in its shortest round-trip form, switching to scientific
/// notation below `1e-4` or from `1e16` on.
///
/// ```
/// # use anchain::libs::hit::format_shortest;
/// assert_eq!(format_shortest(2.4e-5), "2.4e-05");
/// assert_eq!(format_shortest(0.5), "0.5");
/// assert_eq!(format_shortest(1.0), "1.0");
/// assert_eq!(format_shortest(0.0001), "0.0001");
/// assert_eq!(format_shortest(1e-180), "1e-180");
/// ```
pub fn format_shortest(value: f64) -> String {
    if !value.is_finite() {
        return format!("{}", value).to_lowercase();
    }
    if value == 0.0 {
        return format!("{:.1}", value);
    }

    let sci = format!("{:e}", value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if !(-4..16).contains(&exp) {
        format!(
            "{}e{}{:02}",
            mantissa,
            if exp < 0 { '-' } else { '+' },
            exp.abs()
        )
    } else {
        let plain = format!("{}", value);
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    }
}
