use nalgebra::Point3;
use std::fmt::Write;

/// Formats sites as fixed-width columns, one atom per line (`%8.3f%8.3f%8.3f`).
pub fn format_sites(sites: &[Point3<f64>]) -> String {
    let mut out = String::with_capacity(sites.len() * 25);
    for site in sites {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:8.3}{:8.3}{:8.3}", site.x, site.y, site.z);
    }
    out
}

pub fn flatten_sites(sites: &[Point3<f64>]) -> Vec<f64> {
    sites.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}
