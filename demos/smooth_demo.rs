//! Compare naive averaging with circular smoothing near the 0/360 boundary.
//!
//! Run with: cargo run --example smooth_demo

use htsv_shorten::core::{smooth, GaussianKernel};

fn main() {
    let headings = [350.0, 355.0, 359.0, 1.0, 5.0, 10.0, 5.0, 1.0, 359.0, 355.0];
    let sigma = 1.0;

    let kernel = match GaussianKernel::new(sigma) {
        Ok(kernel) => kernel,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("Gaussian kernel (sigma = {sigma}, radius = {})", kernel.radius());
    for (offset, weight) in kernel.weights().iter().enumerate() {
        println!("  {:+}: {weight:.5}", offset as isize - kernel.radius() as isize);
    }
    println!();

    // Plain linear smoothing of the raw degrees, for comparison
    let naive = kernel.convolve_circular(&headings);
    let circular = match smooth(&headings, sigma) {
        Ok(values) => values,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    println!("{:>8} {:>10} {:>10}", "input", "naive", "circular");
    for ((input, naive), circular) in headings.iter().zip(&naive).zip(&circular) {
        println!("{input:>8.1} {naive:>10.2} {circular:>10.2}");
    }
}
