// src/services/csv_transfer.rs

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::{
    common::error::AppError,
    models::product::{parse_leading_int, NewProduct, Product},
};

pub const EXPORT_HEADER: [&str; 6] = ["name", "unit", "category", "brand", "stock", "status"];
const REQUIRED_COLUMNS: [&str; 4] = ["name", "unit", "category", "brand"];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Default)]
pub struct ParsedImport {
    pub products: Vec<NewProduct>,
    pub skipped: usize,
}

struct Columns {
    name: usize,
    unit: usize,
    category: usize,
    brand: usize,
    stock: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, AppError> {
        let find = |column: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(column));

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| find(*column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::CsvParse(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        // Presence checked above.
        let required = |column: &str| find(column).unwrap_or_default();
        Ok(Self {
            name: required("name"),
            unit: required("unit"),
            category: required("category"),
            brand: required("brand"),
            stock: find("stock"),
        })
    }

    fn product(&self, record: &StringRecord) -> Option<NewProduct> {
        let text = |i: usize| record.get(i).filter(|v| !v.is_empty());

        let stock = parse_leading_int(self.stock.and_then(|i| record.get(i)))
            .unwrap_or(0)
            .max(0);

        Some(NewProduct::new(
            text(self.name)?,
            text(self.unit)?,
            text(self.category)?,
            text(self.brand)?,
            stock,
        ))
    }
}

/// Reads products from an uploaded CSV file.
///
/// Columns are matched by header name, in any order and any case. Rows missing a
/// required value, or that cannot be decoded, are counted in `skipped`.
pub fn parse_products(data: &[u8]) -> Result<ParsedImport, AppError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let columns = Columns::locate(&headers)?;

    let mut parsed = ParsedImport::default();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record {}: {}", line + 1, e);
                parsed.skipped += 1;
                continue;
            }
        };

        match columns.product(&record) {
            Some(product) => parsed.products.push(product),
            None => {
                tracing::warn!("Skipping CSV record {}: missing required value", line + 1);
                parsed.skipped += 1;
            }
        }
    }

    Ok(parsed)
}

/// Renders products as CSV with the `name,unit,category,brand,stock,status` header.
pub fn write_products(products: &[Product]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for product in products {
        let stock = product.stock.to_string();
        writer.write_record([
            product.name.as_str(),
            product.unit.as_str(),
            product.category.as_str(),
            product.brand.as_str(),
            stock.as_str(),
            product.status.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("failed to flush CSV export: {}", e))?;
    let text = String::from_utf8(bytes).map_err(anyhow::Error::from)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::ProductStatus;
    use chrono::Utc;

    fn product(name: &str, stock: i64) -> Product {
        Product {
            id: 1,
            name: name.into(),
            unit: "pcs".into(),
            category: "Stationery".into(),
            brand: "JK".into(),
            stock,
            status: ProductStatus::from_stock(stock),
            image: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn parses_rows_and_derives_status() {
        let data = b"name,unit,category,brand,stock\nLaptop,pcs,Electronics,Dell,25\nChair,pcs,Furniture,FeatherLite,0\n";
        let parsed = parse_products(data).unwrap();

        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.products.len(), 2);
        assert_eq!(parsed.products[0], NewProduct::new("Laptop", "pcs", "Electronics", "Dell", 25));
        assert_eq!(parsed.products[1].status, ProductStatus::OutOfStock);
    }

    #[test]
    fn header_matching_ignores_case_order_and_bom() {
        let data = "\u{FEFF}Brand , STOCK,Name,Unit,Category\nLogitech,7,Mouse,pcs,Accessories\n";
        let parsed = parse_products(data.as_bytes()).unwrap();

        assert_eq!(parsed.products, [NewProduct::new("Mouse", "pcs", "Accessories", "Logitech", 7)]);
    }

    #[test]
    fn bad_or_negative_stock_becomes_zero() {
        let data = b"name,unit,category,brand,stock\nA,pcs,X,Y,lots\nB,pcs,X,Y,-4\nC,pcs,X,Y,12 boxes\nD,pcs,X,Y\n";
        let parsed = parse_products(data).unwrap();

        let stocks: Vec<i64> = parsed.products.iter().map(|p| p.stock).collect();
        assert_eq!(stocks, [0, 0, 12, 0]);
        assert!(parsed.products[..2].iter().all(|p| p.status == ProductStatus::OutOfStock));
    }

    #[test]
    fn rows_missing_required_values_are_skipped() {
        let data = b"name,unit,category,brand,stock\n,pcs,X,Y,1\nOk,pcs,X,Y,1\nShort,pcs\n";
        let parsed = parse_products(data).unwrap();

        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse_products(b"name,unit,stock\nA,pcs,1\n").unwrap_err();
        match err {
            AppError::CsvParse(detail) => assert!(detail.contains("category, brand")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn export_writes_header_and_quotes_commas() {
        let csv = write_products(&[product("Paper A4, 500 sheets", 100), product("Pen", 0)]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "name,unit,category,brand,stock,status");
        assert_eq!(lines[1], "\"Paper A4, 500 sheets\",pcs,Stationery,JK,100,In Stock");
        assert_eq!(lines[2], "Pen,pcs,Stationery,JK,0,Out of Stock");
    }

    #[test]
    fn export_of_nothing_is_just_the_header() {
        assert_eq!(write_products(&[]).unwrap(), "name,unit,category,brand,stock,status\n");
    }
}
