// ABOUTME: Shareable recipe card rendered as a self-contained SVG image
// ABOUTME: Brand header, optional round thumbnail, name banner, two-column ingredients and footer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::media::DataUri;
use crate::models::RecipeSuggestion;

const CARD_WIDTH: u32 = 600;
const CARD_HEIGHT: u32 = 800;
const BRAND: &str = "طباخ AI";
const SLOGAN: &str = "من الموجود، نعمل الموعود";
const INGREDIENTS_HEADING: &str = "المكونات:";
const FOOTER: &str = "wasef.app :أنشئت وصفتك باستخدام";

const LIST_TOP: u32 = 360;
const LIST_ROW_HEIGHT: u32 = 34;
const LIST_ROWS: usize = 10;

const PRIMARY: &str = "#e07a2f";
const BACKGROUND: &str = "#fdf8f3";
const CARD: &str = "#ffffff";
const MUTED: &str = "#7a6f66";

/// Rendered card ready to download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareCard {
    /// Suggested download file name
    pub file_name: String,
    /// `data:image/svg+xml;base64,...`
    pub data_uri: String,
}

impl ShareCard {
    /// Render the card for `recipe`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the recipe has no name.
    pub fn render(recipe: &RecipeSuggestion) -> AppResult<Self> {
        let file_name = share_file_name(&recipe.name)?;
        let svg = render_svg(recipe);
        Ok(Self {
            file_name,
            data_uri: DataUri::from_bytes("image/svg+xml", svg.as_bytes()).to_string(),
        })
    }
}

/// `"Chicken  Tikka"` becomes `"Chicken-Tikka-recipe.svg"`
fn share_file_name(name: &str) -> AppResult<String> {
    let stem = name
        .split(|c: char| c.is_whitespace() || c == '/' || c == '\\')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if stem.is_empty() {
        return Err(AppError::invalid_input("Recipe name is required"));
    }
    Ok(format!("{stem}-recipe.svg"))
}

fn render_svg(recipe: &RecipeSuggestion) -> String {
    let mut svg = String::with_capacity(4096);
    let name = recipe.name.trim();
    let name_size = if name.chars().count() > 24 { 26 } else { 36 };

    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}" direction="rtl" font-family="sans-serif">
<rect x="2" y="2" width="596" height="796" fill="{BACKGROUND}" stroke="{PRIMARY}" stroke-width="4"/>
<text x="560" y="78" text-anchor="end" font-size="32" font-weight="bold" fill="{PRIMARY}">{brand}</text>
<text x="560" y="106" text-anchor="end" font-size="14" fill="{MUTED}">{slogan}</text>
<line x1="32" y1="136" x2="568" y2="136" stroke="{PRIMARY}" stroke-opacity="0.5" stroke-width="2"/>
"##,
        brand = encode_text(BRAND),
        slogan = encode_text(SLOGAN),
    );

    if let Some(image) = recipe
        .image_url
        .as_deref()
        .filter(|url| url.starts_with("data:image/"))
    {
        let _ = write!(
            svg,
            r##"<defs><clipPath id="thumb"><circle cx="80" cy="86" r="40"/></clipPath></defs>
<image x="40" y="46" width="80" height="80" preserveAspectRatio="xMidYMid slice" clip-path="url(#thumb)" href="{href}" xlink:href="{href}"/>
<circle cx="80" cy="86" r="40" fill="none" stroke="{PRIMARY}" stroke-opacity="0.5" stroke-width="2"/>
"##,
            href = encode_double_quoted_attribute(image),
        );
    }

    let _ = write!(
        svg,
        r##"<rect x="32" y="160" width="536" height="96" rx="12" fill="{PRIMARY}" fill-opacity="0.1"/>
<text x="300" y="{name_y}" text-anchor="middle" font-size="{name_size}" font-weight="bold" fill="{PRIMARY}">{name}</text>
<rect x="32" y="280" width="536" height="450" rx="12" fill="{CARD}"/>
<text x="544" y="322" text-anchor="end" font-size="24" font-weight="600" fill="#333333">{heading}</text>
<line x1="56" y1="336" x2="544" y2="336" stroke="#e5e0da" stroke-width="2"/>
"##,
        name_y = 208 + name_size / 3,
        name = encode_text(name),
        heading = encode_text(INGREDIENTS_HEADING),
    );

    // Right-to-left: first column on the right
    let ingredients = recipe.ingredient_list();
    let capacity = LIST_ROWS * 2;
    for (index, ingredient) in ingredients.iter().take(capacity).enumerate() {
        let column_x = if index % 2 == 0 { 544 } else { 290 };
        let y = LIST_TOP + (index / 2) as u32 * LIST_ROW_HEIGHT;
        let _ = write!(
            svg,
            r##"<text x="{column_x}" y="{y}" text-anchor="end" font-size="18" fill="#333333"><tspan fill="{PRIMARY}">● </tspan>{item}</text>
"##,
            item = encode_text(ingredient),
        );
    }
    if ingredients.len() > capacity {
        let _ = write!(
            svg,
            r##"<text x="300" y="{y}" text-anchor="middle" font-size="18" fill="{MUTED}">+{more}</text>
"##,
            y = LIST_TOP + LIST_ROWS as u32 * LIST_ROW_HEIGHT,
            more = ingredients.len() - capacity,
        );
    }

    let _ = write!(
        svg,
        r##"<text x="300" y="770" text-anchor="middle" font-size="14" fill="{MUTED}">{footer}</text>
</svg>
"##,
        footer = encode_text(FOOTER),
    );
    svg
}
