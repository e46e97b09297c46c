pub mod api;
pub mod bounceback;
pub mod compare;
pub mod credentials;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod report;

pub use bounceback::{BounceBackRecord, parse_bounce_back, parse_csv};
pub use compare::{
    BounceBackComparison, Overlap, UserComparison, compare_users, compare_with_bounce_back,
};
pub use extract::{extract_all_sailings, extract_sailings};
pub use filter::filter_sailings;
pub use models::{Filters, OfferWithDetails, Sailing, SailingSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let filters = Filters::default();
        assert!(filters.is_empty());

        let source = SailingSource::DetailsIncluded;
        assert_eq!(format!("{}", source), "details-included");
    }

    #[test]
    fn pipeline_accessible_from_crate_root() {
        let result = compare_with_bounce_back(Vec::new(), Vec::new(), &Filters::default());
        assert!(result.overlaps.is_empty());
    }
}
