//! Sitemap probe path lists, ported from the original scanner's
//! `try_alternative_sitemap_locations` / `try_additional_sitemap_paths`
//! tables. Trimmed to 11 entries each (the original well-known list carried
//! 13, including `/static/sitemap.xml` and `/assets/sitemap.xml`, which we
//! drop as vanishingly unlikely to host a sitemap — see DESIGN.md).

pub const WELL_KNOWN_PATHS: [&str; 11] = [
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap-index.xml",
    "/sitemaps/sitemap.xml",
    "/sitemap/sitemap.xml",
    "/wp-sitemap.xml",
    "/sitemap1.xml",
    "/page-sitemap.xml",
    "/post-sitemap.xml",
    "/sitemap.xml.gz",
    "/sitemap_index.xml.gz",
];

pub const SECONDARY_PATHS: [&str; 11] = [
    "/sitemaps.xml",
    "/sitemap/index.xml",
    "/xml-sitemap.xml",
    "/sitemap-pages.xml",
    "/sitemap-posts.xml",
    "/category-sitemap.xml",
    "/product-sitemap.xml",
    "/news-sitemap.xml",
    "/video-sitemap.xml",
    "/image-sitemap.xml",
    "/sitemap0.xml",
];
