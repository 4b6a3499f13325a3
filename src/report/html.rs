use crate::core::model::{ImageReference, OverrepresentedSequence, Record};
use anyhow::{Result, bail};
use std::fmt::Write as FmtWrite;

pub const BLAST_URL: &str =
    "https://blast.ncbi.nlm.nih.gov/Blast.cgi?PROGRAM=blastn&PAGE_TYPE=BlastSearch&QUERY=";

const IMAGE_WIDTH: u32 = 350;
const GALLERY_COLUMNS: usize = 2;

pub fn page_header(title: &str) -> Result<String> {
    let mut html = String::with_capacity(2048);
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\"/>")?;
    writeln!(html, "<title>{}</title>", escape_html(title))?;
    writeln!(html, "<style>")?;
    writeln!(html, "body{{font-family:\"Roboto\",Arial,sans-serif;color:#222;}}")?;
    writeln!(html, "h1,h3{{text-align:center;}}")?;
    writeln!(
        html,
        "table{{border-collapse:collapse;margin:auto;}}"
    )?;
    writeln!(
        html,
        "th,td{{border:1px solid black;text-align:center;padding:8px 10px;}}"
    )?;
    writeln!(html, ".gallery{{width:50%;}}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(html, "<br/>")?;
    writeln!(html, "<h1>{}</h1>", escape_html(title))?;
    Ok(html)
}

pub fn page_footer() -> &'static str {
    "</body>\n</html>\n"
}

pub fn section_title(title: &str) -> Result<String> {
    let mut html = String::new();
    writeln!(html, "<h3>{}</h3>", escape_html(title))?;
    Ok(html)
}

/// Header row from the first record, then one row per record.
pub fn render_table<R: Record>(records: &[R]) -> Result<String> {
    let Some(first) = records.first() else {
        bail!("cannot render a table without records");
    };
    let mut html = String::with_capacity(256 * (records.len() + 1));
    writeln!(html, "<table class=\"data\">")?;
    header_row(&mut html, first.headers(), &[])?;
    for rec in records {
        writeln!(html, "  <tr>")?;
        value_cells(&mut html, rec)?;
        writeln!(html, "  </tr>")?;
    }
    writeln!(html, "</table>")?;
    Ok(html)
}

/// Like [`render_table`] with a trailing BLAST search link per row.
pub fn render_action_table(records: &[OverrepresentedSequence]) -> Result<String> {
    let Some(first) = records.first() else {
        bail!("cannot render a table without records");
    };
    let mut html = String::with_capacity(512 * (records.len() + 1));
    writeln!(html, "<table class=\"data\">")?;
    header_row(&mut html, first.headers(), &["BLAST"])?;
    for rec in records {
        writeln!(html, "  <tr>")?;
        value_cells(&mut html, rec)?;
        writeln!(
            html,
            "    <td><a href=\"{}\" target=\"_blank\">BLAST</a></td>",
            escape_html(&blast_url(&rec.sequence))
        )?;
        writeln!(html, "  </tr>")?;
    }
    writeln!(html, "</table>")?;
    Ok(html)
}

/// Two images per row, each captioned with its sample name.
pub fn render_gallery(images: &[ImageReference]) -> Result<String> {
    let mut html = String::with_capacity(256 * (images.len() + 1));
    writeln!(html, "<table class=\"gallery\">")?;
    writeln!(html, "<tr>")?;
    for (i, image) in images.iter().enumerate() {
        if i > 0 && i % GALLERY_COLUMNS == 0 {
            writeln!(html, "</tr><tr>")?;
        }
        writeln!(
            html,
            "<td><div>{}<br/><img src=\"{}\" width=\"{}\"/></div></td>",
            escape_html(&image.sample_name),
            escape_html(&image.image_path.to_string_lossy()),
            IMAGE_WIDTH
        )?;
    }
    writeln!(html, "</tr>")?;
    writeln!(html, "</table>")?;
    Ok(html)
}

pub fn blast_url(sequence: &str) -> String {
    format!("{}{}", BLAST_URL, encode_query(sequence))
}

fn header_row(out: &mut String, headers: &[&str], extra: &[&str]) -> Result<()> {
    writeln!(out, "  <tr>")?;
    for h in headers.iter().chain(extra) {
        writeln!(out, "    <th>{}</th>", escape_html(h))?;
    }
    writeln!(out, "  </tr>")?;
    Ok(())
}

fn value_cells<R: Record>(out: &mut String, rec: &R) -> Result<()> {
    for v in rec.values() {
        writeln!(out, "    <td>{}</td>", escape_html(v))?;
    }
    Ok(())
}

/// Escapes text for HTML body and double-quoted attribute contexts.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn encode_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{:02X}", b);
        }
    }
    out
}
