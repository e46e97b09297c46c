mod filters;
mod offer;
mod sailing;

pub use filters::Filters;
pub use offer::{
    CampaignOffer, DeparturePort, OfferEnvelope, OfferWithDetails, OffersResponse, RawSailing,
};
pub use sailing::{Sailing, SailingSource};
