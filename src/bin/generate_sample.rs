use std::sync::Arc;

use arrow::array::{Float64Builder, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Format a float the way the source spreadsheets do: comma decimal separator.
fn comma_decimal(v: f64, decimals: usize) -> String {
    format!("{v:.decimals$}").replace('.', ",")
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let regions = ["Nord", "Süd", "Ost", "West"];
    let age_classes = [
        "vor 1918",
        "1919-1948",
        "1949-1957",
        "1958-1968",
        "1969-1978",
        "1979-1983",
        "1984-1994",
        "1995-2001",
        "2002-2009",
        "ab 2010",
    ];
    let components = ["Wall", "Roof", "Floor", "Ceiling"];
    let constructions = ["Masonry", "Cast", "Frame", "Layered", "Sandwich"];

    // (material, thickness mean cm, thickness sd, λ mean, λ sd)
    let materials: [(&str, f64, f64, f64, f64); 6] = [
        ("Brick", 24.0, 6.0, 0.68, 0.10),
        ("Concrete", 20.0, 5.0, 2.10, 0.25),
        ("Mineral wool", 12.0, 4.0, 0.040, 0.005),
        ("Timber", 16.0, 4.0, 0.13, 0.02),
        ("Plaster", 2.0, 0.5, 0.70, 0.08),
        ("Sand-lime brick", 17.5, 4.0, 0.99, 0.12),
    ];

    let mut col_region: Vec<String> = Vec::new();
    let mut col_age: Vec<String> = Vec::new();
    let mut col_material: Vec<String> = Vec::new();
    let mut col_component: Vec<String> = Vec::new();
    let mut col_construction: Vec<String> = Vec::new();
    let mut col_thickness: Vec<Option<f64>> = Vec::new();
    // λ is kept textual with comma decimals, mirroring the source encoding.
    let mut col_lambda: Vec<String> = Vec::new();

    for region in &regions {
        for age in &age_classes {
            for _ in 0..12 {
                let &(material, t_mean, t_sd, l_mean, l_sd) = rng.pick(&materials);

                col_region.push(region.to_string());
                col_age.push(age.to_string());
                col_material.push(material.to_string());
                col_component.push(rng.pick(&components).to_string());
                col_construction.push(rng.pick(&constructions).to_string());

                // ~5% of thickness cells are blank in the source
                if rng.next_f64() < 0.05 {
                    col_thickness.push(None);
                } else {
                    col_thickness.push(Some(rng.gauss(t_mean, t_sd).abs().max(0.5)));
                }

                // ~5% of λ cells carry free text instead of a number
                if rng.next_f64() < 0.05 {
                    col_lambda.push("not measured".to_string());
                } else {
                    let lambda = rng.gauss(l_mean, l_sd).abs().max(0.01);
                    col_lambda.push(comma_decimal(lambda, 3));
                }
            }
        }
    }
    let n_rows = col_region.len();

    // ---- CSV ----
    let csv_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record([
            "Region",
            "Construction Age Class",
            "Material",
            "Component",
            "Construction",
            "Thickness [cm]",
            "λ-Wert [W/(mK)]",
        ])
        .expect("Failed to write CSV header");
    for i in 0..n_rows {
        let thickness = col_thickness[i]
            .map(|t| comma_decimal(t, 1))
            .unwrap_or_default();
        writer
            .write_record([
                col_region[i].as_str(),
                col_age[i].as_str(),
                col_material[i].as_str(),
                col_component[i].as_str(),
                col_construction[i].as_str(),
                thickness.as_str(),
                col_lambda[i].as_str(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    // ---- Parquet ----
    let mut thickness_builder = Float64Builder::new();
    for t in &col_thickness {
        thickness_builder.append_option(*t);
    }
    let thickness_array = thickness_builder.finish();

    let str_array = |col: &[String]| {
        StringArray::from(col.iter().map(|s| s.as_str()).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Region", DataType::Utf8, false),
        Field::new("Construction Age Class", DataType::Utf8, false),
        Field::new("Material", DataType::Utf8, false),
        Field::new("Component", DataType::Utf8, false),
        Field::new("Construction", DataType::Utf8, false),
        Field::new("Thickness [cm]", DataType::Float64, true),
        Field::new("λ-Wert [W/(mK)]", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(str_array(&col_region)),
            Arc::new(str_array(&col_age)),
            Arc::new(str_array(&col_material)),
            Arc::new(str_array(&col_component)),
            Arc::new(str_array(&col_construction)),
            Arc::new(thickness_array),
            Arc::new(str_array(&col_lambda)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let parquet_path = "sample_data.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n_rows} records to {csv_path} and {parquet_path}");
}
