//! Particle record and slice definitions.
//!
//! These are the typed forms of the raw trace rows and the column layout the
//! writer persists.

use serde::{Deserialize, Serialize};

/// One particle at one timestep
///
/// All raw fields are coerced to `f64`. `eta` and `nev` are computed by the
/// slice extractor; the placeholders in the raw row are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRecord {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub p0: f64,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub m: f64,
    pub ityp: f64,
    pub di3: f64,
    pub ch: f64,
    pub pcn: f64,
    pub ncoll: f64,
    pub ppt: f64,
    pub eta: f64,
    pub nev: u32,
}

impl ParticleRecord {
    /// Momentum magnitude `sqrt(px² + py² + pz²)`
    pub fn momentum(&self) -> f64 {
        momentum_magnitude(self.px, self.py, self.pz)
    }

    /// Value of a floating-point column (`None` for `nev`)
    pub fn float_value(&self, column: ParticleColumn) -> Option<f64> {
        let value = match column {
            ParticleColumn::T => self.t,
            ParticleColumn::X => self.x,
            ParticleColumn::Y => self.y,
            ParticleColumn::Z => self.z,
            ParticleColumn::P0 => self.p0,
            ParticleColumn::Px => self.px,
            ParticleColumn::Py => self.py,
            ParticleColumn::Pz => self.pz,
            ParticleColumn::M => self.m,
            ParticleColumn::Ityp => self.ityp,
            ParticleColumn::Di3 => self.di3,
            ParticleColumn::Ch => self.ch,
            ParticleColumn::Pcn => self.pcn,
            ParticleColumn::Ncoll => self.ncoll,
            ParticleColumn::Ppt => self.ppt,
            ParticleColumn::Eta => self.eta,
            ParticleColumn::Nev => return None,
        };
        Some(value)
    }
}

/// `sqrt(px² + py² + pz²)`
pub fn momentum_magnitude(px: f64, py: f64, pz: f64) -> f64 {
    (px * px + py * py + pz * pz).sqrt()
}

/// Pseudorapidity `ln((p + pz) / (p - pz))`
///
/// Returns `None` when the value is undefined: momentum exactly along the
/// beam axis (`p == |pz|`, which includes `p == 0`).
pub fn pseudorapidity(px: f64, py: f64, pz: f64) -> Option<f64> {
    let p = momentum_magnitude(px, py, pz);
    let eta = ((p + pz) / (p - pz)).ln();
    eta.is_finite().then_some(eta)
}

/// Column of the persisted event table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleColumn {
    T,
    X,
    Y,
    Z,
    P0,
    Px,
    Py,
    Pz,
    M,
    Ityp,
    Di3,
    Ch,
    Pcn,
    Ncoll,
    Ppt,
    Eta,
    Nev,
}

impl ParticleColumn {
    pub fn name(self) -> &'static str {
        match self {
            ParticleColumn::T => "t",
            ParticleColumn::X => "x",
            ParticleColumn::Y => "y",
            ParticleColumn::Z => "z",
            ParticleColumn::P0 => "p0",
            ParticleColumn::Px => "px",
            ParticleColumn::Py => "py",
            ParticleColumn::Pz => "pz",
            ParticleColumn::M => "m",
            ParticleColumn::Ityp => "ityp",
            ParticleColumn::Di3 => "di3",
            ParticleColumn::Ch => "ch",
            ParticleColumn::Pcn => "pcn",
            ParticleColumn::Ncoll => "ncoll",
            ParticleColumn::Ppt => "ppt",
            ParticleColumn::Eta => "eta",
            ParticleColumn::Nev => "nev",
        }
    }
}

const STANDARD_COLUMNS: [ParticleColumn; 8] = [
    ParticleColumn::T,
    ParticleColumn::X,
    ParticleColumn::Y,
    ParticleColumn::Z,
    ParticleColumn::M,
    ParticleColumn::Ityp,
    ParticleColumn::Eta,
    ParticleColumn::Nev,
];

const FULL_COLUMNS: [ParticleColumn; 17] = [
    ParticleColumn::T,
    ParticleColumn::X,
    ParticleColumn::Y,
    ParticleColumn::Z,
    ParticleColumn::P0,
    ParticleColumn::Px,
    ParticleColumn::Py,
    ParticleColumn::Pz,
    ParticleColumn::M,
    ParticleColumn::Ityp,
    ParticleColumn::Di3,
    ParticleColumn::Ch,
    ParticleColumn::Pcn,
    ParticleColumn::Ncoll,
    ParticleColumn::Ppt,
    ParticleColumn::Eta,
    ParticleColumn::Nev,
];

/// Which columns the writer persists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnSet {
    /// `t, x, y, z, m, ityp, eta, nev`
    #[default]
    Standard,
    /// Every raw column plus `eta, nev`
    Full,
}

impl ColumnSet {
    pub fn columns(self) -> &'static [ParticleColumn] {
        match self {
            ColumnSet::Standard => &STANDARD_COLUMNS,
            ColumnSet::Full => &FULL_COLUMNS,
        }
    }
}

/// All particles of one timestep of one event
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// Position of the slice within the event, starting at 0
    pub index: usize,

    /// Row index of the separator that opened this slice
    pub separator: usize,

    /// Timestep time; taken from the records, or the separator row when the slice is empty
    pub time: Option<f64>,

    pub records: Vec<ParticleRecord>,
}

impl Slice {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_momentum_magnitude() {
        assert_eq!(momentum_magnitude(3.0, 4.0, 0.0), 5.0);
        assert_eq!(momentum_magnitude(0.0, 0.0, -2.0), 2.0);
    }

    #[test]
    fn test_pseudorapidity_transverse_is_zero() {
        assert_eq!(pseudorapidity(1.0, 0.0, 0.0), Some(0.0));
    }

    #[test]
    fn test_pseudorapidity_matches_formula() {
        let (px, py, pz) = (0.3_f64, -0.4_f64, 1.2_f64);
        let p = (px * px + py * py + pz * pz).sqrt();
        let expected = ((p + pz) / (p - pz)).ln();
        let eta = pseudorapidity(px, py, pz).unwrap();
        assert!((eta - expected).abs() < 1e-12);
        assert!(eta > 0.0);
        assert!(pseudorapidity(px, py, -pz).unwrap() < 0.0);
    }

    #[test]
    fn test_pseudorapidity_undefined_along_beam_axis() {
        assert_eq!(pseudorapidity(0.0, 0.0, 5.0), None);
        assert_eq!(pseudorapidity(0.0, 0.0, -5.0), None);
        assert_eq!(pseudorapidity(0.0, 0.0, 0.0), None);
    }

    #[test]
    fn test_column_sets() {
        let names: Vec<&str> = ColumnSet::Standard
            .columns()
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(names, vec!["t", "x", "y", "z", "m", "ityp", "eta", "nev"]);

        let full: Vec<&str> = ColumnSet::Full.columns().iter().map(|c| c.name()).collect();
        assert_eq!(full, crate::utils::config::RAW_COLUMNS.to_vec());
    }
}
