//! Dashboard aggregation: activity breakdown (bar) and fit percentages (pie).

use serde::Serialize;

use super::domain::AlumniFields;

/// Raw counts a repository produces for one (optionally year-filtered) set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartCounts {
    pub pengangguran: u64,
    pub kuliah: u64,
    pub kerja: u64,
    pub kuliah_dan_kerja: u64,
    /// Rows where either fit flag is false.
    pub tidak_sesuai: u64,
    pub kuliah_sesuai: u64,
    pub kerja_sesuai: u64,
}

impl ChartCounts {
    /// Fold one record into the counts.
    pub fn tally(&mut self, a: &AlumniFields) {
        match Activity::classify(a) {
            Activity::Pengangguran => self.pengangguran += 1,
            Activity::Kuliah => self.kuliah += 1,
            Activity::Kerja => self.kerja += 1,
            Activity::KuliahDanKerja => self.kuliah_dan_kerja += 1,
        }
        if !a.kesesuaian_kerja || !a.kesesuaian_kuliah {
            self.tidak_sesuai += 1;
        }
        if a.kesesuaian_kuliah {
            self.kuliah_sesuai += 1;
        }
        if a.kesesuaian_kerja {
            self.kerja_sesuai += 1;
        }
    }
}

/// Exactly one of these holds for every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Pengangguran,
    Kuliah,
    Kerja,
    KuliahDanKerja,
}

impl Activity {
    pub fn classify(a: &AlumniFields) -> Self {
        let kerja = is_filled(a.tempat_kerja.as_deref());
        let kuliah = is_filled(a.tempat_kuliah.as_deref());
        match (kerja, kuliah) {
            (false, false) => Activity::Pengangguran,
            (false, true) => Activity::Kuliah,
            (true, false) => Activity::Kerja,
            (true, true) => Activity::KuliahDanKerja,
        }
    }
}

fn is_filled(v: Option<&str>) -> bool {
    v.map_or(false, |s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarData {
    pub total_pengangguran: u64,
    pub total_kuliah: u64,
    pub total_kerja: u64,
    pub total_kuliah_dan_kerja: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PieData {
    pub pct_tidak_sesuai: u64,
    pub pct_kuliah_sesuai: u64,
    pub pct_kerja_sesuai: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub bar_data: BarData,
    pub pie_data: PieData,
}

impl From<ChartCounts> for ChartData {
    fn from(c: ChartCounts) -> Self {
        let total = c.tidak_sesuai + c.kuliah_sesuai + c.kerja_sesuai;
        Self {
            bar_data: BarData {
                total_pengangguran: c.pengangguran,
                total_kuliah: c.kuliah,
                total_kerja: c.kerja,
                total_kuliah_dan_kerja: c.kuliah_dan_kerja,
            },
            pie_data: PieData {
                pct_tidak_sesuai: rounded_percentage(c.tidak_sesuai, total),
                pct_kuliah_sesuai: rounded_percentage(c.kuliah_sesuai, total),
                pct_kerja_sesuai: rounded_percentage(c.kerja_sesuai, total),
            },
        }
    }
}

/// `part / total * 100`, rounded half-up; 0 when `total` is 0.
pub fn rounded_percentage(part: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    (part * 200 + total) / (2 * total)
}
