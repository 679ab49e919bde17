//! CSS selectors for the search-results feed markup
//!
//! Grouped by the part of the flow that uses them. Category labels carry no
//! stable class, so they are matched by walking `span`s and comparing text.

// ===== Search affordance =====

/// Outer page body containing the search affordance
pub const PAGE_BODY: &str = ".page-body";
/// Button that opens the search overlay
pub const SEARCH_BUTTON: &str = "button[data-element='search-button']";
/// The search overlay container
pub const SEARCH_OVERLAY: &str = "div[data-element='search-overlay']";
/// Text input inside the overlay
pub const SEARCH_INPUT: &str = "input[name='q']";
/// Submit button inside the overlay
pub const SEARCH_SUBMIT: &str = "button[type='submit']";

// ===== Category filtering =====

/// Main content region of the results page
pub const PAGE_CONTENT: &str = ".page-content";
/// Expandable list of category filters
pub const CATEGORY_TOGGLER: &str = "ps-toggler";
/// Candidate label elements inside the toggler
pub const CATEGORY_LABEL: &str = "span";
/// Label text of the expansion control
pub const SEE_ALL_LABEL: &str = "See All";

// ===== Results and pagination =====

/// Container holding the list of result articles
pub const RESULTS_MENU: &str = ".search-results-module-results-menu";
/// One article card in the results list
pub const ARTICLE: &str = "ps-promo";
/// Control advancing to the next results page
pub const NEXT_PAGE: &str = ".search-results-module-next-page";

// ===== Article fields =====

/// Content block of one article card
pub const CONTENT: &str = ".promo-content";
/// Wrapper around the article heading
pub const TITLE_CONTAINER: &str = ".promo-title-container";
/// The heading element itself
pub const TITLE_HEADING: &str = "h3";
/// Optional teaser text
pub const DESCRIPTION: &str = ".promo-description";
/// Element carrying the publish timestamp
pub const TIMESTAMP: &str = ".promo-timestamp";
/// Attribute with the epoch-millisecond publish time
pub const TIMESTAMP_ATTR: &str = "data-timestamp";
/// Optional media block with the thumbnail
pub const MEDIA: &str = ".promo-media";
/// Thumbnail image inside the media block
pub const MEDIA_IMAGE: &str = "img";
/// Detail link on the media or title block
pub const DETAIL_LINK: &str = "a";
