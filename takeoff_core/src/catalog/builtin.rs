//! Built-in KS / JIS unit-weight tables.
//!
//! A compact selection of common sizes so the tool works without an external
//! catalog file. Values are nominal table weights and are illustrative; the
//! T-bar table is deliberately left without weights, matching the source
//! spreadsheets where that sheet has no W column.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{CatalogItem, ProfileCatalog, SectionDims};

/// (key, kg/m, depth, width, web, flange)
type Row = (&'static str, Option<f64>, f64, f64, f64, f64);

// H-beams: H x B x t1 x t2
const KS_H: &[Row] = &[
    ("100x100x6x8", Some(17.2), 100.0, 100.0, 6.0, 8.0),
    ("125x125x6.5x9", Some(23.8), 125.0, 125.0, 6.5, 9.0),
    ("150x75x5x7", Some(14.0), 150.0, 75.0, 5.0, 7.0),
    ("150x150x7x10", Some(31.5), 150.0, 150.0, 7.0, 10.0),
    ("175x175x7.5x11", Some(40.2), 175.0, 175.0, 7.5, 11.0),
    ("200x100x5.5x8", Some(21.3), 200.0, 100.0, 5.5, 8.0),
    ("200x200x8x12", Some(49.9), 200.0, 200.0, 8.0, 12.0),
    ("250x125x6x9", Some(29.6), 250.0, 125.0, 6.0, 9.0),
    ("250x250x9x14", Some(72.4), 250.0, 250.0, 9.0, 14.0),
    ("300x150x6.5x9", Some(36.7), 300.0, 150.0, 6.5, 9.0),
    ("300x300x10x15", Some(94.0), 300.0, 300.0, 10.0, 15.0),
    ("350x175x7x11", Some(49.6), 350.0, 175.0, 7.0, 11.0),
    ("350x350x12x19", Some(137.0), 350.0, 350.0, 12.0, 19.0),
    ("400x200x8x13", Some(66.0), 400.0, 200.0, 8.0, 13.0),
    ("400x400x13x21", Some(172.0), 400.0, 400.0, 13.0, 21.0),
    ("450x200x9x14", Some(76.0), 450.0, 200.0, 9.0, 14.0),
    ("500x200x10x16", Some(89.6), 500.0, 200.0, 10.0, 16.0),
    ("600x200x11x17", Some(106.0), 600.0, 200.0, 11.0, 17.0),
];

// Channels: H x B x t1 x t2
const KS_C: &[Row] = &[
    ("75x40x5x7", Some(6.92), 75.0, 40.0, 5.0, 7.0),
    ("100x50x5x7.5", Some(9.36), 100.0, 50.0, 5.0, 7.5),
    ("125x65x6x8", Some(13.4), 125.0, 65.0, 6.0, 8.0),
    ("150x75x6.5x10", Some(18.6), 150.0, 75.0, 6.5, 10.0),
    ("200x80x7.5x11", Some(24.6), 200.0, 80.0, 7.5, 11.0),
    ("250x90x9x13", Some(34.6), 250.0, 90.0, 9.0, 13.0),
    ("300x90x9x13", Some(38.1), 300.0, 90.0, 9.0, 13.0),
];

// Equal angles: A x B x t
const KS_L: &[Row] = &[
    ("50x50x6", Some(4.43), 50.0, 50.0, 6.0, 6.0),
    ("65x65x6", Some(5.91), 65.0, 65.0, 6.0, 6.0),
    ("75x75x6", Some(6.85), 75.0, 75.0, 6.0, 6.0),
    ("75x75x9", Some(9.96), 75.0, 75.0, 9.0, 9.0),
    ("90x90x10", Some(13.3), 90.0, 90.0, 10.0, 10.0),
    ("100x100x10", Some(14.9), 100.0, 100.0, 10.0, 10.0),
    ("125x125x12", Some(22.7), 125.0, 125.0, 12.0, 12.0),
];

// Lipped channels: H x A x C x t (lip stored as flange)
const KS_LC: &[Row] = &[
    ("100x50x20x2.3", Some(4.06), 100.0, 50.0, 2.3, 20.0),
    ("125x50x20x2.3", Some(4.51), 125.0, 50.0, 2.3, 20.0),
    ("150x65x20x3.2", Some(7.51), 150.0, 65.0, 3.2, 20.0),
    ("200x75x20x3.2", Some(9.27), 200.0, 75.0, 3.2, 20.0),
];

// Square / rectangular tubes: H x B x t
const KS_RECT: &[Row] = &[
    ("100x100x3.2", Some(9.52), 100.0, 100.0, 3.2, 3.2),
    ("100x100x4.5", Some(13.1), 100.0, 100.0, 4.5, 4.5),
    ("125x125x4.5", Some(16.6), 125.0, 125.0, 4.5, 4.5),
    ("150x150x6", Some(26.2), 150.0, 150.0, 6.0, 6.0),
    ("200x200x8", Some(46.5), 200.0, 200.0, 8.0, 8.0),
];

// T-bars: no unit weights in the source table
const KS_T: &[Row] = &[
    ("100x100x5.5x8", None, 100.0, 100.0, 5.5, 8.0),
    ("150x150x6.5x9", None, 150.0, 150.0, 6.5, 9.0),
];

const JIS_H: &[Row] = &[
    ("100x100x6x8", Some(17.2), 100.0, 100.0, 6.0, 8.0),
    ("150x150x7x10", Some(31.5), 150.0, 150.0, 7.0, 10.0),
    ("200x200x8x12", Some(49.9), 200.0, 200.0, 8.0, 12.0),
    ("250x250x9x14", Some(72.4), 250.0, 250.0, 9.0, 14.0),
    ("300x300x10x15", Some(94.0), 300.0, 300.0, 10.0, 15.0),
    ("400x200x8x13", Some(66.0), 400.0, 200.0, 8.0, 13.0),
];

const JIS_I: &[Row] = &[
    ("100x75x5x8", Some(12.9), 100.0, 75.0, 5.0, 8.0),
    ("150x75x5.5x9.5", Some(17.1), 150.0, 75.0, 5.5, 9.5),
    ("200x100x7x10", Some(26.0), 200.0, 100.0, 7.0, 10.0),
    ("250x125x7.5x12.5", Some(38.3), 250.0, 125.0, 7.5, 12.5),
    ("300x150x8x13", Some(48.3), 300.0, 150.0, 8.0, 13.0),
];

const JIS_C: &[Row] = &[
    ("100x50x5x7.5", Some(9.36), 100.0, 50.0, 5.0, 7.5),
    ("150x75x6.5x10", Some(18.6), 150.0, 75.0, 6.5, 10.0),
    ("200x80x7.5x11", Some(24.6), 200.0, 80.0, 7.5, 11.0),
];

const JIS_L: &[Row] = &[
    ("50x50x6", Some(4.43), 50.0, 50.0, 6.0, 6.0),
    ("75x75x9", Some(9.96), 75.0, 75.0, 9.0, 9.0),
    ("100x100x10", Some(14.9), 100.0, 100.0, 10.0, 10.0),
];

static BUILTIN: Lazy<Arc<ProfileCatalog>> = Lazy::new(|| Arc::new(build()));

/// The built-in catalog, built once per process and shared.
pub fn builtin_catalog() -> Arc<ProfileCatalog> {
    Arc::clone(&BUILTIN)
}

fn build() -> ProfileCatalog {
    let mut db = ProfileCatalog::new();

    let tables: [(&str, &str, &[Row]); 10] = [
        ("KS", "H", KS_H),
        ("KS", "C", KS_C),
        ("KS", "L", KS_L),
        ("KS", "LC", KS_LC),
        ("KS", "Rect", KS_RECT),
        ("KS", "T", KS_T),
        ("JIS", "H", JIS_H),
        ("JIS", "I", JIS_I),
        ("JIS", "C", JIS_C),
        ("JIS", "L", JIS_L),
    ];

    for (standard, shape, rows) in tables {
        for &(key, kgm, depth, width, web, flange) in rows {
            db.insert(
                standard,
                shape,
                CatalogItem {
                    key: key.to_string(),
                    name: format!("{}-{}", name_prefix(shape), key),
                    kgm,
                    dims: Some(SectionDims {
                        depth_mm: depth,
                        width_mm: width,
                        web_mm: Some(web),
                        flange_mm: Some(flange),
                    }),
                },
            );
        }
    }

    db.version = Some("builtin-ks-jis".to_string());
    db
}

fn name_prefix(shape: &str) -> &str {
    match shape {
        "Rect" => "□",
        other => other,
    }
}
