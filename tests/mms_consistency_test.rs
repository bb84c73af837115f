//! Consistency of manufactured sources with their profiles.
//!
//! The analytic source of every profile is compared with the strong-form
//! operator evaluated from fourth-order finite differences of the profile
//! value alone. Boundary traces are checked against the value and gradient.

use dg_mms::equations::{AdvectionModel, Burgers, LinearAdvection, TargetEquation};
use dg_mms::mms::{
    AnalyticProfile, ArctanLayer, ExponentialLayer, ManufacturedSolutionProvider, SineWave,
    TanhFront, Trace,
};
use dg_mms::types::Coords;

const FD_STEP: f64 = 1e-3;

/// Fourth-order central first derivative of f at 0.
fn d1(f: impl Fn(f64) -> f64) -> f64 {
    let h = FD_STEP;
    (-f(2.0 * h) + 8.0 * f(h) - 8.0 * f(-h) + f(-2.0 * h)) / (12.0 * h)
}

/// Fourth-order central second derivative of f at 0.
fn d2(f: impl Fn(f64) -> f64) -> f64 {
    let h = FD_STEP;
    (-f(2.0 * h) + 16.0 * f(h) - 30.0 * f(0.0) + 16.0 * f(-h) - f(-2.0 * h)) / (12.0 * h * h)
}

/// Strong-form residual u_t + f'(u)·∇u − D Δu from finite differences.
fn fd_source(profile: &dyn AnalyticProfile, eq: &TargetEquation, x: Coords, t: f64) -> f64 {
    let u = |x: Coords, t: f64| profile.value(x, t).unwrap();

    let ux = d1(|s| u([x[0] + s, x[1]], t));
    let uy = d1(|s| u([x[0], x[1] + s], t));
    let uxx = d2(|s| u([x[0] + s, x[1]], t));
    let uyy = d2(|s| u([x[0], x[1] + s], t));
    let ut = d1(|s| u(x, t + s));

    let value = u(x, t);
    let mut g = 0.0;
    if eq.transient {
        g += ut;
    }
    match eq.advection {
        Some(AdvectionModel::Linear(a)) => g += a.velocity[0] * ux + a.velocity[1] * uy,
        Some(AdvectionModel::Burgers(b)) => {
            g += value * (b.direction[0] * ux + b.direction[1] * uy)
        }
        None => {}
    }
    g - eq.diffusion * (uxx + uyy)
}

fn assert_source_consistent(profile: &dyn AnalyticProfile, eq: &TargetEquation, points: &[Coords]) {
    for &x in points {
        for t in [0.0, 0.35] {
            let exact = profile.source(eq, x, t).unwrap();
            let approx = fd_source(profile, eq, x, t);
            let scale = exact.abs().max(1.0);
            assert!(
                (exact - approx).abs() < 1e-6 * scale,
                "{}: source {exact} vs finite differences {approx} at {x:?}, t = {t}",
                profile.name()
            );
        }
    }
}

const POINTS: [Coords; 3] = [[0.3, 0.7], [0.61, 0.22], [0.45, 0.5]];

#[test]
fn test_sine_wave_advection_diffusion() {
    let profile = SineWave::oblique()
        .with_velocity([1.0, 0.5])
        .with_decay(0.3);
    let eq = TargetEquation::advection_diffusion(LinearAdvection::new([1.0, 0.5]), 0.2)
        .with_transient(true);
    assert_source_consistent(&profile, &eq, &POINTS);
}

#[test]
fn test_heat_mode_is_exact() {
    // e^{−t} sin(x) solves u_t = u_xx, so the source vanishes
    let profile = SineWave::heat_mode();
    let eq = TargetEquation::diffusion(1.0).with_transient(true);
    for &x in &POINTS {
        let g = profile.source(&eq, x, 0.4).unwrap();
        assert!(g.abs() < 1e-12, "source {g} at {x:?}");
    }
}

#[test]
fn test_tanh_front_burgers() {
    let eps = 0.1;
    let profile = TanhFront::burgers(eps);
    let eq = TargetEquation::advection_diffusion(Burgers::one_d(), eps).with_transient(true);
    assert_source_consistent(&profile, &eq, &[[-0.2, 0.0], [0.1, 0.0], [0.55, 0.0]]);
}

#[test]
fn test_tanh_front_is_exact_burgers_wave() {
    // 1 − tanh((x + ½ − t) / 2ε) travels at unit speed under viscosity ε
    let eps = 0.05;
    let profile = TanhFront::burgers(eps);
    let eq = TargetEquation::advection_diffusion(Burgers::one_d(), eps).with_transient(true);
    for x in [-0.6, -0.45, 0.0, 0.3] {
        let g = profile.source(&eq, [x, 0.0], 0.1).unwrap();
        assert!(g.abs() < 1e-10, "source {g} at x = {x}");
    }
}

#[test]
fn test_arctan_layer() {
    let profile = ArctanLayer::new(0.5);
    let eq = TargetEquation::advection_diffusion(LinearAdvection::new([1.0, 1.0]), 0.5);
    assert_source_consistent(&profile, &eq, &POINTS);

    let diffusion_only = TargetEquation::diffusion(0.5);
    assert_source_consistent(&profile, &diffusion_only, &POINTS);
}

#[test]
fn test_exponential_layer() {
    let eps = 0.5;
    let profile = ExponentialLayer::new(eps);
    let eq = TargetEquation::advection_diffusion(LinearAdvection::new([1.0, 1.0]), eps);
    assert_source_consistent(&profile, &eq, &POINTS);
}

#[test]
fn test_zero_width_is_domain_error() {
    let eq = TargetEquation::diffusion(0.0);
    let profiles: [Box<dyn AnalyticProfile>; 3] = [
        Box::new(ArctanLayer::new(0.0)),
        Box::new(ExponentialLayer::new(0.0)),
        Box::new(TanhFront::burgers(0.0)),
    ];
    for p in &profiles {
        assert!(p.value([0.3, 0.3], 0.0).unwrap_err().is_domain());
        assert!(p.source(&eq, [0.3, 0.3], 0.0).unwrap_err().is_domain());
    }
}

#[test]
fn test_boundary_traces() {
    let eps = 0.5;
    let eq = TargetEquation::advection_diffusion(LinearAdvection::new([1.0, 1.0]), eps);
    let provider = ManufacturedSolutionProvider::new(ExponentialLayer::new(eps), eq)
        .with_edges(&["left", "right", "bottom", "top"])
        .unwrap();

    let x = [0.0, 0.4];
    let value = provider.value(x, 0.0).unwrap();
    let grad = provider.gradient(x, 0.0).unwrap();

    match provider.trace_labeled(x, 0.0, "left", 0).unwrap() {
        Trace::Value(v) => assert_eq!(v, value),
        other => panic!("unexpected trace {other:?}"),
    }
    match provider.trace_labeled(x, 0.0, "left", 1).unwrap() {
        Trace::Gradient(g) => assert_eq!(g, grad),
        other => panic!("unexpected trace {other:?}"),
    }

    let request = dg_mms::BoundaryTraceRequest::new("left", 1)
        .unwrap()
        .normal_component();
    let normal = provider.trace(x, 0.0, &request).unwrap();
    assert_eq!(normal, Trace::NormalDerivative(-grad[0]));

    // u vanishes on x = 1 and y = 1
    for (label, x) in [("right", [1.0, 0.3]), ("top", [0.6, 1.0])] {
        let v = provider.trace_labeled(x, 0.0, label, 0).unwrap();
        assert!(v.scalar().unwrap().abs() < 1e-12, "{label}: {v:?}");
    }
}

#[test]
fn test_boundary_labels_match_exactly() {
    let eq = TargetEquation::diffusion(1.0);
    let provider = ManufacturedSolutionProvider::new(SineWave::diffusion_1d(), eq)
        .with_edges(&["left"])
        .unwrap();

    // "bottom_left" contains "left" but is a different edge
    let err = provider
        .trace_labeled([0.0, 0.0], 0.0, "bottom_left", 0)
        .unwrap_err();
    assert!(err.is_configuration());

    let err = provider.trace_labeled([0.0, 0.0], 0.0, "Left", 0).unwrap_err();
    assert!(err.is_configuration());

    let err = provider.trace_labeled([0.0, 0.0], 0.0, "left", 2).unwrap_err();
    assert!(err.is_configuration());
}
