//! Write a small synthetic `data.csv` in the wide bulk-download layout.

use anyhow::{Context, Result};

const FIRST_YEAR: i32 = 1970;
const LAST_YEAR: i32 = 2020;

/// (M49 code, name, GDP per capita in 1970, population in millions, manufacturing share)
const COUNTRIES: &[(&str, &str, f64, f64, f64)] = &[
    ("'004", "Afghanistan", 160.0, 11.0, 12.0),
    ("'008", "Albania", 420.0, 2.1, 30.0),
    ("'012", "Algeria", 350.0, 14.0, 14.0),
    ("'032", "Argentina", 1300.0, 24.0, 28.0),
    ("'036", "Australia", 3300.0, 12.5, 22.0),
    ("'076", "Brazil", 450.0, 95.0, 26.0),
    ("'156", "China", 115.0, 820.0, 35.0),
    ("'384", "Côte d'Ivoire", 290.0, 5.5, 11.0),
    ("'392", "Japan", 2000.0, 104.0, 33.0),
    ("'566", "Nigeria", 230.0, 56.0, 8.0),
];

/// Deterministic splitmix64 stream so the sample is reproducible.
struct Noise(u64);

impl Noise {
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative jitter in [1 - spread, 1 + spread).
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

/// Format like a spreadsheet export: thousands separators on large values.
fn format_value(v: f64) -> String {
    let text = format!("{v:.1}");
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "0"));
    let (sign, digits) = int_part
        .strip_prefix('-')
        .map_or(("", int_part), |rest| ("-", rest));
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{frac}")
}

fn main() -> Result<()> {
    let mut noise = Noise(42);
    let years: Vec<i32> = (FIRST_YEAR..=LAST_YEAR).collect();

    let mut header = vec![
        "Area Code (M49)".to_string(),
        "Area".to_string(),
        "Item Code".to_string(),
        "Item".to_string(),
        "Element Code".to_string(),
        "Element".to_string(),
        "Unit".to_string(),
    ];
    for year in &years {
        header.push(format!("Y{year}"));
        header.push(format!("Y{year}F"));
    }

    let output_path = "data.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating data.csv")?;
    writer.write_record(&header)?;

    let mut rows = 0usize;
    for (n, &(code, area, gdp_pc, pop, share)) in COUNTRIES.iter().enumerate() {
        let growth = 1.01 + 0.004 * (n % 5) as f64;
        let mut per_capita = Vec::with_capacity(years.len());
        let mut manufacturing = Vec::with_capacity(years.len());
        let mut total = Vec::with_capacity(years.len());
        let mut population = Vec::with_capacity(years.len());

        for (i, _) in years.iter().enumerate() {
            let t = i as f64;
            let pc = gdp_pc * growth.powf(t) * noise.jitter(0.05);
            let people = pop * 1.015f64.powf(t);
            per_capita.push(pc);
            manufacturing.push((share + 4.0 * (t / 8.0).sin()) * noise.jitter(0.03));
            total.push(pc * people);
            population.push(people * 1000.0);
        }

        let series: [(&str, &str, &str, &str, &str, &[f64]); 5] = [
            ("22008", "Gross Domestic Product", "6119", "Value US$ per capita", "USD", per_capita.as_slice()),
            ("22077", "Value Added (Total Manufacturing)", "61290", "Share of GDP US$", "%", manufacturing.as_slice()),
            ("22008", "Gross Domestic Product", "6110", "Value US$", "million USD", total.as_slice()),
            ("22008", "Gross Domestic Product", "6224", "Value LCU", "million LCU", total.as_slice()),
            ("3010", "Population - Est. & Proj.", "511", "Total Population", "1000 No", population.as_slice()),
        ];

        for (s, (item_code, item, element_code, element, unit, values)) in series.iter().enumerate() {
            // Nigeria reports no total GDP, so its bubbles have no radius.
            if area == "Nigeria" && *element == "Value US$" {
                continue;
            }
            let mut record = vec![
                code.to_string(),
                area.to_string(),
                item_code.to_string(),
                item.to_string(),
                element_code.to_string(),
                element.to_string(),
                unit.to_string(),
            ];
            for (i, v) in values.iter().enumerate() {
                let cell = match (n + s + i) % 97 {
                    0 => String::new(),
                    1 => "N/A".to_string(),
                    _ => format_value(*v),
                };
                record.push(cell);
                record.push(if i % 11 == 0 { "E".to_string() } else { "X".to_string() });
            }
            writer.write_record(&record)?;
            rows += 1;
        }
    }

    writer.flush().context("flushing data.csv")?;

    println!(
        "Wrote {rows} rows ({} countries, {FIRST_YEAR}..{LAST_YEAR}) to {output_path}",
        COUNTRIES.len()
    );
    Ok(())
}
