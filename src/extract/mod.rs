//! Selector-driven extraction of product attributes from a parsed page.
//!
//! Every extractor is a pure function over the document tree and is
//! fault-isolated: a missing element or failed parse is logged and yields
//! the absent value instead of aborting the run. The specification parser
//! walks a two-level section/row structure into a nested mapping, and the
//! flattening step projects a handful of known (section, key) pairs into
//! top-level record fields.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};
use tracing::{error, info, warn};

use crate::models::{ProductRecord, Specifications};

/// Collapse whitespace runs (including non-breaking spaces) to single
/// spaces and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract the product title.
pub fn product_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("div.main-right-block h1.desktop-only-title").unwrap();

    let Some(title) = document.select(&selector).next() else {
        error!("Product title not found");
        return None;
    };

    let title_text = element_text(title);
    info!("Product title found: {title_text}");
    Some(title_text)
}

/// Extract the regular price.
///
/// The raw text keeps only digits, dots and commas; the decimal comma is
/// normalized to a dot before parsing. A missing element or unparseable
/// remainder yields `None`.
pub fn product_price(document: &Html) -> Option<f64> {
    let selector = Selector::parse("div.br-pr-price.main-price-block div.price-wrapper").unwrap();

    let Some(price_block) = document.select(&selector).next() else {
        error!("Price not found");
        return None;
    };

    let price_text: String = element_text(price_block)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let price_text = price_text.replace(',', ".");

    match price_text.parse::<f64>() {
        Ok(price) => {
            info!("Price found: {price}");
            Some(price)
        }
        Err(e) => {
            error!("Error while parsing price {price_text:?}: {e}");
            None
        }
    }
}

/// Collect every gallery photo URL, in document order. Images without a
/// `src` attribute are skipped; no matches is an empty list, not an error.
pub fn product_photos(document: &Html) -> Vec<String> {
    let selector = Selector::parse("div.product-block-right a.product-modal-button img").unwrap();

    let photos: Vec<String> = document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .map(str::to_string)
        .collect();

    info!("Added {} photos", photos.len());
    photos
}

/// Extract the review count.
pub fn review_count(document: &Html) -> Option<i64> {
    let selector =
        Selector::parse("div.fast-navigation-comments-body a.scroll-to-element.reviews-count span")
            .unwrap();

    let Some(span) = document.select(&selector).next() else {
        warn!("Review count not found");
        return None;
    };

    match element_text(span).parse::<i64>() {
        Ok(count) => {
            info!("Review count found: {count}");
            Some(count)
        }
        Err(e) => {
            warn!("Error while parsing review count: {e}");
            None
        }
    }
}

/// Extract the vendor product code.
pub fn product_code(document: &Html) -> Option<String> {
    let selector = Selector::parse("div.title span.br-pr-code-val").unwrap();

    let Some(code_span) = document.select(&selector).next() else {
        warn!("Product code not found");
        return None;
    };

    let code_text = element_text(code_span);
    info!("Product code found: {code_text}");
    Some(code_text)
}

/// Parse one specification row into a key/value pair.
///
/// The first span is the key; each remaining span contributes value
/// fragments (anchor texts when the span holds links, its own text
/// otherwise), joined by `", "`. Rows with fewer than two spans, or an
/// empty key, yield nothing.
fn parse_specification_row(row: ElementRef<'_>) -> Option<(String, String)> {
    let span_selector = Selector::parse("span").unwrap();
    let link_selector = Selector::parse("a").unwrap();

    let spans: Vec<ElementRef<'_>> = row.select(&span_selector).collect();
    let (key_span, value_spans) = spans.split_first()?;
    if value_spans.is_empty() {
        return None;
    }

    let key = element_text(*key_span);
    if key.is_empty() {
        return None;
    }

    let mut values = Vec::new();
    for span in value_spans {
        let links: Vec<ElementRef<'_>> = span.select(&link_selector).collect();
        if links.is_empty() {
            let text_val = element_text(*span);
            if !text_val.is_empty() {
                values.push(text_val);
            }
        } else {
            for link in links {
                values.push(element_text(link));
            }
        }
    }

    Some((key, values.join(", ")))
}

/// Parse one detail item: its `h3` heading names the section, its nested
/// row divs fill the section's key/value mapping. An item without a
/// heading is skipped.
fn parse_specification_detail(item: ElementRef<'_>) -> Option<(String, BTreeMap<String, String>)> {
    let heading_selector = Selector::parse("h3").unwrap();
    let row_selector = Selector::parse("div > div").unwrap();

    let Some(heading) = item.select(&heading_selector).next() else {
        error!("Specification detail item has no heading, skipping");
        return None;
    };
    let section_title = element_text(heading);

    let mut section = BTreeMap::new();
    for row in item.select(&row_selector) {
        if let Some((key, value)) = parse_specification_row(row) {
            section.insert(key, clean_text(&value));
        }
    }

    Some((section_title, section))
}

/// Extract all specification sections into a nested mapping.
///
/// Sections sharing a title across detail items merge per key, with later
/// occurrences overwriting overlapping keys. No specification blocks on
/// the page yields an empty mapping.
pub fn product_specifications(document: &Html) -> Specifications {
    let block_selector = Selector::parse("div.br-pr-scroll.br-loading.br-pr-no-scroll").unwrap();
    let detail_selector = Selector::parse("div.br-pr-chr-item").unwrap();

    let blocks: Vec<ElementRef<'_>> = document.select(&block_selector).collect();
    if blocks.is_empty() {
        warn!("No specification blocks found");
        return Specifications::new();
    }

    let mut specs = Specifications::new();

    for block in blocks {
        for detail in block.select(&detail_selector) {
            if let Some((title, section)) = parse_specification_detail(detail) {
                specs.entry(title).or_default().extend(section);
            }
        }
        info!("Collected details for one specification block");
    }

    info!("Collected {} specification sections", specs.len());
    specs
}

/// The five specification fields denormalized onto the record.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FlattenedSpecs {
    pub manufacturer: Option<String>,
    pub memory: Option<String>,
    pub color: Option<String>,
    pub screen_diagonal: Option<String>,
    pub screen_resolution: Option<String>,
}

fn lookup_spec(specs: &Specifications, section: &str, key: &str, field: &str) -> Option<String> {
    let value = specs.get(section).and_then(|s| s.get(key)).cloned();
    if value.is_none() {
        warn!("Could not extract {field}: {section:?} / {key:?} not present");
    }
    value
}

/// Project fixed (section, key) pairs out of the nested mapping. Missing
/// sections or keys leave the field absent.
pub fn extract_specific_specs(specs: &Specifications) -> FlattenedSpecs {
    FlattenedSpecs {
        manufacturer: lookup_spec(specs, "Інші", "Виробник", "manufacturer"),
        memory: lookup_spec(specs, "Функції пам'яті", "Вбудована пам'ять", "memory"),
        color: lookup_spec(specs, "Фізичні характеристики", "Колір", "color"),
        screen_diagonal: lookup_spec(specs, "Дисплей", "Діагональ екрану", "screen_diagonal"),
        screen_resolution: lookup_spec(
            specs,
            "Дисплей",
            "Роздільна здатність екрану",
            "screen_resolution",
        ),
    }
}

/// Run every extractor over the page and assemble the product record.
pub fn collect_product_data(document: &Html) -> ProductRecord {
    info!("Start collecting product data");

    let specifications = product_specifications(document);
    let flattened = extract_specific_specs(&specifications);

    ProductRecord {
        title: product_title(document),
        regular_price: product_price(document),
        sale_price: None,
        photos: product_photos(document),
        review_count: review_count(document),
        code: product_code(document),
        manufacturer: flattened.manufacturer,
        memory: flattened.memory,
        color: flattened.color,
        screen_diagonal: flattened.screen_diagonal,
        screen_resolution: flattened.screen_resolution,
        specifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{body}</body></html>"))
    }

    #[test]
    fn clean_text_collapses_whitespace_and_nbsp() {
        assert_eq!(clean_text("  Samsung\u{a0}\u{a0}Galaxy \n S24  "), "Samsung Galaxy S24");
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn title_present() {
        let doc = page(
            r#"<div class="main-right-block"><h1 class="desktop-only-title">Смартфон Samsung</h1></div>"#,
        );
        assert_eq!(product_title(&doc), Some("Смартфон Samsung".to_string()));
    }

    #[test]
    fn title_missing_is_none_not_empty() {
        let doc = page(r#"<div class="main-right-block"><h1>wrong class</h1></div>"#);
        assert_eq!(product_title(&doc), None);
    }

    #[test]
    fn price_parses_grouped_ukrainian_format() {
        let doc = page(
            r#"<div class="br-pr-price main-price-block"><div class="price-wrapper">12 345,67 грн</div></div>"#,
        );
        assert_eq!(product_price(&doc), Some(12345.67));
    }

    #[test]
    fn price_garbage_is_none() {
        let doc = page(
            r#"<div class="br-pr-price main-price-block"><div class="price-wrapper">abc</div></div>"#,
        );
        assert_eq!(product_price(&doc), None);
    }

    #[test]
    fn price_missing_element_is_none() {
        assert_eq!(product_price(&page("<p>no price here</p>")), None);
    }

    #[test]
    fn photos_skip_entries_without_src() {
        let doc = page(
            r#"<div class="product-block-right">
                <a class="product-modal-button"><img src="https://img/1.jpg"></a>
                <a class="product-modal-button"><img src="https://img/2.jpg"></a>
                <a class="product-modal-button"><img alt="no src"></a>
                <a class="product-modal-button"><img src="https://img/3.jpg"></a>
            </div>"#,
        );
        assert_eq!(
            product_photos(&doc),
            vec!["https://img/1.jpg", "https://img/2.jpg", "https://img/3.jpg"]
        );
    }

    #[test]
    fn photos_empty_page_is_empty_vec() {
        assert!(product_photos(&page("<div></div>")).is_empty());
    }

    #[test]
    fn review_count_parses_integer() {
        let doc = page(
            r#"<div class="fast-navigation-comments-body">
                <a class="scroll-to-element reviews-count"><span> 17 </span></a>
            </div>"#,
        );
        assert_eq!(review_count(&doc), Some(17));
    }

    #[test]
    fn review_count_non_numeric_is_none() {
        let doc = page(
            r#"<div class="fast-navigation-comments-body">
                <a class="scroll-to-element reviews-count"><span>немає</span></a>
            </div>"#,
        );
        assert_eq!(review_count(&doc), None);
    }

    #[test]
    fn product_code_present_and_missing() {
        let doc = page(r#"<div class="title"><span class="br-pr-code-val">867530</span></div>"#);
        assert_eq!(product_code(&doc), Some("867530".to_string()));
        assert_eq!(product_code(&page("<div class=\"title\"></div>")), None);
    }

    fn spec_block(details: &str) -> Html {
        page(&format!(
            r#"<div class="br-pr-scroll br-loading br-pr-no-scroll">{details}</div>"#
        ))
    }

    #[test]
    fn specification_row_key_value() {
        let doc = spec_block(
            r#"<div class="br-pr-chr-item"><h3>Фізичні характеристики</h3>
                <div><div><span>Колір</span><span>Чорний</span></div></div>
            </div>"#,
        );
        let specs = product_specifications(&doc);
        assert_eq!(
            specs["Фізичні характеристики"]["Колір"],
            "Чорний".to_string()
        );
    }

    #[test]
    fn specification_row_with_single_span_is_skipped() {
        let doc = spec_block(
            r#"<div class="br-pr-chr-item"><h3>Дисплей</h3>
                <div><div><span>Самотній ключ</span></div></div>
            </div>"#,
        );
        let specs = product_specifications(&doc);
        assert!(specs["Дисплей"].is_empty());
    }

    #[test]
    fn specification_value_joins_anchor_texts() {
        let doc = spec_block(
            r##"<div class="br-pr-chr-item"><h3>Зв'язок</h3>
                <div><div><span>Стандарти</span><span><a href="#">A</a><a href="#">B</a></span></div></div>
            </div>"##,
        );
        let specs = product_specifications(&doc);
        assert_eq!(specs["Зв'язок"]["Стандарти"], "A, B".to_string());
    }

    #[test]
    fn specification_value_joins_across_spans_and_normalizes() {
        let detail = "<div class=\"br-pr-chr-item\"><h3>Дисплей</h3>\
            <div><div><span>Тип</span><span>OLED</span><span>120\u{a0}Гц</span></div></div>\
            </div>";
        let specs = product_specifications(&spec_block(detail));
        assert_eq!(specs["Дисплей"]["Тип"], "OLED, 120 Гц".to_string());
    }

    #[test]
    fn duplicate_section_titles_merge_per_key() {
        let doc = spec_block(
            r#"<div class="br-pr-chr-item"><h3>Дисплей</h3>
                <div><div><span>Діагональ екрану</span><span>6.1"</span></div></div>
            </div>
            <div class="br-pr-chr-item"><h3>Дисплей</h3>
                <div><div><span>Роздільна здатність екрану</span><span>2556x1179</span></div></div>
            </div>"#,
        );
        let specs = product_specifications(&doc);
        let display = &specs["Дисплей"];
        assert_eq!(display.len(), 2);
        assert_eq!(display["Діагональ екрану"], "6.1\"");
        assert_eq!(display["Роздільна здатність екрану"], "2556x1179");
    }

    #[test]
    fn detail_item_without_heading_is_skipped_siblings_survive() {
        let doc = spec_block(
            r#"<div class="br-pr-chr-item">
                <div><div><span>Ключ</span><span>Значення</span></div></div>
            </div>
            <div class="br-pr-chr-item"><h3>Інші</h3>
                <div><div><span>Виробник</span><span>Samsung</span></div></div>
            </div>"#,
        );
        let specs = product_specifications(&doc);
        assert_eq!(specs.len(), 1);
        assert_eq!(specs["Інші"]["Виробник"], "Samsung");
    }

    #[test]
    fn no_specification_blocks_yields_empty_mapping() {
        assert!(product_specifications(&page("<div>nothing</div>")).is_empty());
    }

    #[test]
    fn flattening_missing_section_leaves_field_absent() {
        let mut specs = Specifications::new();
        specs
            .entry("Дисплей".to_string())
            .or_default()
            .insert("Діагональ екрану".to_string(), "6.7\"".to_string());

        let flat = extract_specific_specs(&specs);
        assert_eq!(flat.manufacturer, None);
        assert_eq!(flat.memory, None);
        assert_eq!(flat.color, None);
        assert_eq!(flat.screen_diagonal, Some("6.7\"".to_string()));
        assert_eq!(flat.screen_resolution, None);
    }

    #[test]
    fn empty_page_still_builds_a_record() {
        let record = collect_product_data(&page("<div>blank</div>"));
        assert_eq!(record.title, None);
        assert_eq!(record.regular_price, None);
        assert_eq!(record.sale_price, None);
        assert!(record.photos.is_empty());
        assert_eq!(record.review_count, None);
        assert_eq!(record.code, None);
        assert!(record.specifications.is_empty());
    }
}
