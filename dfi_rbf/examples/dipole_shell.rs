use dfi_rbf::{
    DfiRbfInterpolator, VectorTestFields, create_evaluation_grid, generate_random_points,
    config::Params,
    interpolant_config::InterpolantSettings,
    progress::{ProgressMsg, closure_sink},
};
use faer::Mat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Scatter source points through the shell 2 <= |r| <= 4 around a dipole at the origin
    let num_points = 400usize;
    let unit = generate_random_points(num_points, 3, Some(42));
    let radii = generate_random_points(num_points, 1, Some(7));
    let points = Mat::from_fn(num_points, 3, |i, k| {
        let direction = [
            2.0 * unit[(i, 0)] - 1.0,
            2.0 * unit[(i, 1)] - 1.0,
            2.0 * unit[(i, 2)] - 1.0,
        ];
        let length = direction.iter().map(|c| c * c).sum::<f64>().sqrt().max(1e-12);
        let radius = 2.0 + 2.0 * radii[(i, 0)];
        radius * direction[k] / length
    });

    // Sample the dipole field at the source points
    let moment = [0.0, 0.0, 10.0];
    let vectors = VectorTestFields::dipole(&points, moment);

    let (sink, listener) = closure_sink(64, |msg: ProgressMsg| match msg {
        ProgressMsg::SystemAssembled {
            system_size,
            elapsed,
            ..
        } => println!("assembled {system_size} x {system_size} system in {elapsed:?}"),
        ProgressMsg::SystemSolved { solver, elapsed } => {
            println!("solved with {solver:?} in {elapsed:?}")
        }
        ProgressMsg::DuplicatesRemoved { num_duplicates } => {
            println!("removed {num_duplicates} duplicate points")
        }
        ProgressMsg::Message { message } => println!("{message}"),
    });

    // Setup and solve the RBF
    let interpolant_settings = InterpolantSettings::builder(0.5).build();
    let params = Params::builder().parallel(true).build();

    let rbfi = DfiRbfInterpolator::builder(points, vectors, interpolant_settings)
        .params(params)
        .progress_callback(sink)
        .build()?;

    // Evaluate along a grid slice through the shell, away from the singular origin
    let n = 15;
    let targets = create_evaluation_grid(&[(-3.0, 3.0), (-3.0, 3.0), (2.5, 2.5)], &[n, n, 1]);
    let interpolated = rbfi.evaluate(&targets);
    let truth = VectorTestFields::dipole(&targets, moment);

    let mut max_error = 0.0f64;
    let mut max_divergence = 0.0f64;
    for i in 0..targets.nrows() {
        for k in 0..3 {
            max_error = max_error.max((interpolated[(i, k)] - truth[(i, k)]).abs());
        }
        let q = [targets[(i, 0)], targets[(i, 1)], targets[(i, 2)]];
        max_divergence = max_divergence.max(rbfi.divergence_at(q).abs());
    }

    println!("max abs error on the z = 2.5 slice: {max_error:.3e}");
    println!("max abs divergence on the z = 2.5 slice: {max_divergence:.3e}");

    drop(rbfi);
    listener.join().map_err(|_| "progress listener panicked")?;

    Ok(())
}
