//! Spreadsheet import: an Excel/ODS workbook or CSV with a heading row
//! naming alumni columns.
//!
//! Parsing is split from persistence so a malformed file is rejected before
//! any row is written. Row-level problems become entries in [`ImportReport`].

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use uuid::Uuid;

use super::domain::AlumniInput;
use crate::errors::ServiceError;

const REQUIRED_COLUMNS: [&str; 4] = ["nama", "email", "tahun_mulai", "tahun_lulus"];
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xd0, 0xcf, 0x11, 0xe0, 0xa1, 0xb1, 0x1a, 0xe1];

/// One data row: its spreadsheet line and either a create input or the reason
/// it could not be read.
#[derive(Debug)]
pub struct ParsedRow {
    pub line: u64,
    pub input: Result<AlumniInput, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowOutcome {
    pub row: u64,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
    pub rows: Vec<RowOutcome>,
}

impl ImportReport {
    pub fn record_success(&mut self, row: u64, id: Uuid) {
        self.total += 1;
        self.imported += 1;
        self.rows.push(RowOutcome { row, status: RowStatus::Success, id: Some(id), message: None });
    }

    pub fn record_failure(&mut self, row: u64, message: impl Into<String>) {
        self.total += 1;
        self.failed += 1;
        self.rows.push(RowOutcome { row, status: RowStatus::Fail, id: None, message: Some(message.into()) });
    }

    pub fn is_clean(&self) -> bool { self.failed == 0 }
}

/// Parse an upload, reading it as a workbook when it carries an xlsx/ods
/// (zip) or xls (OLE) signature and as CSV otherwise.
pub fn parse_upload(bytes: &[u8], max_rows: usize) -> Result<Vec<ParsedRow>, ServiceError> {
    if is_workbook(bytes) {
        parse_workbook(bytes, max_rows)
    } else {
        parse_csv(bytes, max_rows)
    }
}

fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC)
}

/// Parse UTF-8 CSV. Fails as a whole when the file is not UTF-8, lacks a
/// required column, or exceeds `max_rows` data rows.
pub fn parse_csv(bytes: &[u8], max_rows: usize) -> Result<Vec<ParsedRow>, ServiceError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|_| ServiceError::Import("file harus berupa excel atau CSV UTF-8".into()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Err(ServiceError::Import("file kosong".into()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ServiceError::Import(format!("header tidak terbaca: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let records = reader.records().map(|record| -> Result<(u64, Vec<String>), ServiceError> {
        let record = record.map_err(|e| ServiceError::Import(format!("baris tidak terbaca: {e}")))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        Ok((line, record.iter().map(str::to_string).collect()))
    });
    collect_rows(&headers, records, max_rows)
}

/// Parse the first sheet of an xlsx, xls or ods workbook. The first row of
/// the sheet is the heading.
pub fn parse_workbook(bytes: &[u8], max_rows: usize) -> Result<Vec<ParsedRow>, ServiceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ServiceError::Import(format!("file excel tidak terbaca: {e}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ServiceError::Import("file kosong".into()))?
        .map_err(|e| ServiceError::Import(format!("sheet tidak terbaca: {e}")))?;

    // sheet rows are 0-based; report them the way a spreadsheet numbers them
    let first_line = range.start().map(|(row, _)| u64::from(row) + 1).unwrap_or(1);
    let mut lines = range
        .rows()
        .enumerate()
        .map(|(i, cells)| (first_line + i as u64, cells.iter().map(cell_text).collect::<Vec<_>>()));

    let (_, headers) = lines.next().ok_or_else(|| ServiceError::Import("file kosong".into()))?;
    collect_rows(&headers, lines.map(Ok), max_rows)
}

/// Whole-number floats are how spreadsheets store years and 1/0 flags.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

fn collect_rows<I>(headers: &[String], records: I, max_rows: usize) -> Result<Vec<ParsedRow>, ServiceError>
where
    I: IntoIterator<Item = Result<(u64, Vec<String>), ServiceError>>,
{
    let columns = column_index(headers);
    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !columns.contains_key(**c)) {
        return Err(ServiceError::Import(format!("kolom {missing} tidak ditemukan")));
    }

    let mut rows = Vec::new();
    for record in records {
        let (line, cells) = record?;
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        if rows.len() == max_rows {
            return Err(ServiceError::Import(format!("jumlah baris melebihi batas {max_rows}")));
        }
        rows.push(ParsedRow { line, input: row_to_input(&cells, &columns) });
    }
    Ok(rows)
}

/// Heading name (trimmed, lower-cased, spaces as `_`) to column position.
fn column_index(headers: &[String]) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase().replace(' ', "_"), i))
        .collect()
}

fn row_to_input(cells: &[String], columns: &HashMap<String, usize>) -> Result<AlumniInput, String> {
    let cell = |name: &str| -> Option<String> {
        columns
            .get(name)
            .and_then(|&i| cells.get(i))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    Ok(AlumniInput {
        nama: cell("nama").unwrap_or_default(),
        email: cell("email").unwrap_or_default(),
        password: cell("password"),
        tempat_kerja: cell("tempat_kerja"),
        jabatan_kerja: cell("jabatan_kerja"),
        tempat_kuliah: cell("tempat_kuliah"),
        prodi_kuliah: cell("prodi_kuliah"),
        tahun_mulai: parse_year("tahun_mulai", cell("tahun_mulai"))?,
        tahun_lulus: parse_year("tahun_lulus", cell("tahun_lulus"))?,
        kesesuaian_kerja: parse_flag("kesesuaian_kerja", cell("kesesuaian_kerja"))?,
        kesesuaian_kuliah: parse_flag("kesesuaian_kuliah", cell("kesesuaian_kuliah"))?,
        jurusan_id: cell("jurusan_id")
            .map(|v| Uuid::parse_str(&v).map_err(|_| format!("jurusan_id tidak valid: {v}")))
            .transpose()?,
    })
}

fn parse_year(field: &str, value: Option<String>) -> Result<i32, String> {
    let value = value.ok_or_else(|| format!("{field} wajib diisi"))?;
    value.parse::<i32>().map_err(|_| format!("{field} harus berupa angka: {value}"))
}

/// Spreadsheet truthiness: 1/0, true/false, ya/tidak, yes/no, y/n. Blank is false.
pub fn parse_flag(field: &str, value: Option<String>) -> Result<bool, String> {
    let Some(value) = value else { return Ok(false) };
    match value.to_lowercase().as_str() {
        "1" | "true" | "ya" | "yes" | "y" => Ok(true),
        "0" | "false" | "tidak" | "no" | "n" => Ok(false),
        _ => Err(format!("{field} harus bernilai ya/tidak: {value}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Nama,Email,Tahun Mulai,Tahun Lulus,Tempat Kerja,Tempat Kuliah,Kesesuaian Kerja,Kesesuaian Kuliah\n";

    #[test]
    fn reads_rows_with_normalized_headers() {
        let csv = format!("{HEADER}Jane,jane@x.id,2016,2020,PT Maju,,ya,0\nBudi,budi@x.id,2015,2019,,UGM,,YES\n");
        let rows = parse_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);

        let jane = rows[0].input.as_ref().unwrap();
        assert_eq!(jane.nama, "Jane");
        assert_eq!(jane.tempat_kerja.as_deref(), Some("PT Maju"));
        assert_eq!(jane.tempat_kuliah, None);
        assert!(jane.kesesuaian_kerja);
        assert!(!jane.kesesuaian_kuliah);

        let budi = rows[1].input.as_ref().unwrap();
        assert!(!budi.kesesuaian_kerja);
        assert!(budi.kesesuaian_kuliah);
    }

    #[test]
    fn bad_cells_fail_only_their_row() {
        let csv = format!("{HEADER}Jane,jane@x.id,dua ribu,2020,,,,\nBudi,budi@x.id,2015,2019,,,mungkin,\nSiti,siti@x.id,2015,2019,,,,\n");
        let rows = parse_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].input.as_ref().unwrap_err().contains("tahun_mulai"));
        assert!(rows[1].input.as_ref().unwrap_err().contains("kesesuaian_kerja"));
        assert!(rows[2].input.is_ok());
    }

    #[test]
    fn blank_lines_are_skipped_but_line_numbers_kept() {
        let csv = format!("{HEADER},,,,,,,\nJane,jane@x.id,2016,2020,,,,\n");
        let rows = parse_csv(csv.as_bytes(), 100).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].line, 3);
    }

    #[test]
    fn missing_required_column_aborts() {
        let err = parse_csv(b"nama,email,tahun_mulai\nJane,j@x.id,2016\n", 100).unwrap_err();
        assert!(matches!(err, ServiceError::Import(ref m) if m.contains("tahun_lulus")));
    }

    #[test]
    fn non_utf8_and_empty_files_abort() {
        assert!(matches!(parse_csv(&[0xff, 0xfe, 0x00], 10), Err(ServiceError::Import(_))));
        assert!(matches!(parse_csv(b"  \n", 10), Err(ServiceError::Import(_))));
    }

    #[test]
    fn row_limit_aborts() {
        let csv = format!("{HEADER}A,a@x.id,2016,2020,,,,\nB,b@x.id,2016,2020,,,,\n");
        assert!(parse_csv(csv.as_bytes(), 2).is_ok());
        assert!(matches!(parse_csv(csv.as_bytes(), 1), Err(ServiceError::Import(_))));
    }

    const WORKBOOK: &[u8] = include_bytes!("../../fixtures/alumni.xlsx");

    #[test]
    fn reads_first_sheet_of_workbook() {
        let rows = parse_upload(WORKBOOK, 100).unwrap();
        assert_eq!(rows.iter().map(|r| r.line).collect::<Vec<_>>(), vec![2, 4]);

        let jane = rows[0].input.as_ref().unwrap();
        assert_eq!(jane.nama, "Jane");
        assert_eq!((jane.tahun_mulai, jane.tahun_lulus), (2016, 2020));
        assert_eq!(jane.tempat_kerja.as_deref(), Some("PT Maju"));
        assert!(jane.kesesuaian_kerja);
        assert!(!jane.kesesuaian_kuliah);

        let budi = rows[1].input.as_ref().unwrap();
        assert_eq!(budi.tempat_kuliah.as_deref(), Some("UGM"));
        assert!(budi.kesesuaian_kerja);
        assert!(budi.kesesuaian_kuliah);
    }

    #[test]
    fn workbook_row_limit_aborts() {
        assert!(matches!(parse_upload(WORKBOOK, 1), Err(ServiceError::Import(_))));
    }

    #[test]
    fn broken_workbook_aborts() {
        let err = parse_upload(b"PK\x03\x04bukan workbook", 10).unwrap_err();
        assert!(matches!(err, ServiceError::Import(_)));
    }

    #[test]
    fn whole_number_cells_read_as_integers() {
        assert_eq!(cell_text(&Data::Float(2016.0)), "2016");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::Bool(true)), "true");
        assert_eq!(cell_text(&Data::Empty), "");
    }

    #[test]
    fn flag_vocabulary() {
        for yes in ["1", "true", "Ya", "YES", "y"] {
            assert_eq!(parse_flag("f", Some(yes.into())), Ok(true));
        }
        for no in ["0", "false", "tidak", "No", "n"] {
            assert_eq!(parse_flag("f", Some(no.into())), Ok(false));
        }
        assert_eq!(parse_flag("f", None), Ok(false));
        assert!(parse_flag("f", Some("2".into())).is_err());
    }

    #[test]
    fn report_counts_and_serialization() {
        let mut report = ImportReport::default();
        let id = Uuid::new_v4();
        report.record_success(2, id);
        report.record_failure(3, "email tidak valid: x");
        assert_eq!((report.total, report.imported, report.failed), (2, 1, 1));
        assert!(!report.is_clean());
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["rows"][0]["status"], "success");
        assert!(v["rows"][0].get("message").is_none());
        assert_eq!(v["rows"][1]["row"], 3);
        assert!(v["rows"][1].get("id").is_none());
    }
}
