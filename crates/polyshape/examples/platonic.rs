//! Print shape descriptors of the fixture solids for a quick sanity check.
//!
//! Usage:
//!   cargo run -p polyshape --example platonic
//!   cargo run -p polyshape --example platonic -- prism 12
//!
//! Columns: facets, vertices, volume, surface area, iq, mean curvature,
//! tau, asphericity.

use polyshape::api::{special, ConvexPolyhedron, GeomError};

fn main() -> Result<(), GeomError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let shapes: Vec<(String, ConvexPolyhedron)> = match args.first().map(String::as_str) {
        Some("prism") => {
            let n = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(6);
            vec![(format!("prism({n})"), special::prism(n)?)]
        }
        _ => vec![
            ("tetrahedron".to_string(), special::tetrahedron()?),
            ("cube".to_string(), special::cube()?),
            ("octahedron".to_string(), special::octahedron()?),
            ("dodecahedron".to_string(), special::dodecahedron()?),
            ("icosahedron".to_string(), special::icosahedron()?),
        ],
    };
    println!(
        "{:<14} {:>3} {:>3} {:>9} {:>9} {:>7} {:>7} {:>7} {:>7}",
        "shape", "F", "V", "volume", "area", "iq", "R", "tau", "alpha"
    );
    for (name, shape) in &shapes {
        let p = shape.polyhedron();
        println!(
            "{:<14} {:>3} {:>3} {:>9.4} {:>9.4} {:>7.4} {:>7.4} {:>7.4} {:>7.4}",
            name,
            p.num_facets(),
            p.num_vertices(),
            p.volume(),
            p.surface_area(),
            p.iq(),
            p.mean_curvature(),
            p.tau(),
            p.asphericity()
        );
    }
    Ok(())
}
