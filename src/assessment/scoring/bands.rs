//! Ordered-threshold lookup shared by CMMS metric banding, maturity
//! classification, and DataInput scoring tables.

/// How a band's lower bound admits values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandEdge {
    /// The value must exceed the bound.
    Exclusive,
    /// A value sitting exactly on the bound belongs to the band.
    Inclusive,
}

/// One threshold interval carrying an arbitrary payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Band<T> {
    pub lower_bound: f64,
    pub value: T,
}

/// Threshold table kept sorted by descending lower bound. Classification
/// walks the table and returns the first band the value clears; callers
/// model the `else` branch of a threshold ladder with `unwrap_or` on a
/// named floor value.
#[derive(Debug, Clone)]
pub struct BandTable<T> {
    edge: BandEdge,
    bands: Vec<Band<T>>,
}

impl<T> BandTable<T> {
    pub fn new(edge: BandEdge, mut bands: Vec<Band<T>>) -> Self {
        bands.sort_by(|a, b| {
            b.lower_bound
                .partial_cmp(&a.lower_bound)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { edge, bands }
    }

    pub fn classify(&self, value: f64) -> Option<&T> {
        self.bands
            .iter()
            .find(|band| match self.edge {
                BandEdge::Exclusive => value > band.lower_bound,
                BandEdge::Inclusive => value >= band.lower_bound,
            })
            .map(|band| &band.value)
    }
}
