use crate::core::detail_page::DetailSection;
use crate::core::table::{Column, PageView, SortState, NO_DATA};
use crate::domain::model::{Template, TrialRecord};
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 24;
const EMPTY_CELL: &str = "-";

fn cell_text(record: &TrialRecord, key: &str) -> String {
    let text = record
        .non_blank(key)
        .map(|s| s.replace(['\n', '\t'], " "))
        .unwrap_or_else(|| EMPTY_CELL.to_string());
    truncate(&text, MAX_CELL_WIDTH)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

fn header_text(column: &Column, sorting: &SortState) -> String {
    match sorting.direction_of(&column.key) {
        Some(false) => format!("{} ↑", column.header),
        Some(true) => format!("{} ↓", column.header),
        None => column.header.clone(),
    }
}

/// 以純文字輸出目前頁面，含排序箭頭與頁碼
pub fn render_table(view: &PageView<'_>, columns: &[Column], sorting: &SortState) -> String {
    let mut out = String::new();

    if view.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
    } else {
        let headers: Vec<String> = columns.iter().map(|c| header_text(c, sorting)).collect();
        let cells: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|record| columns.iter().map(|c| cell_text(record, &c.key)).collect())
            .collect();

        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |values: &[String]| -> String {
            values
                .iter()
                .zip(&widths)
                .map(|(v, w)| pad(v, *w))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let _ = writeln!(out, "{}", line(&headers));
        let _ = writeln!(
            out,
            "{}",
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-")
        );
        for row in &cells {
            let _ = writeln!(out, "{}", line(row));
        }
    }

    let _ = writeln!(
        out,
        "페이지 {} / {}  (전체 {}건, 표시 개수 {})",
        view.page_index + 1,
        view.display_page_count(),
        view.total,
        view.page_size
    );
    out
}

pub fn render_detail(title: &str, is_meta: bool, sections: &[DetailSection]) -> String {
    let mut out = String::new();
    if sections.is_empty() {
        let _ = writeln!(out, "{}", NO_DATA);
        return out;
    }

    if is_meta {
        let _ = writeln!(out, "{}  [메타(요약/구분) 행]", title);
    } else {
        let _ = writeln!(out, "{}", title);
    }

    for section in sections {
        let _ = writeln!(out, "\n## {}", section.title);
        let width = section
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, value) in &section.rows {
            let _ = writeln!(
                out,
                "{}  {}",
                pad(label, width),
                value.as_deref().unwrap_or(EMPTY_CELL)
            );
        }
    }
    out
}

pub fn render_templates(templates: &[Template]) -> String {
    if templates.is_empty() {
        return format!("{}\n", NO_DATA);
    }
    let mut out = String::new();
    for template in templates {
        let _ = writeln!(
            out,
            "{}\t{}\t(기본 제목: {})",
            template.id, template.label, template.default_subject
        );
    }
    out
}
