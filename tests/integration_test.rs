use glam::{Vec3, Vec4};
use volcano_viewer::config::AppConfig;
use volcano_viewer::core::App;
use volcano_viewer::input::Command;
use volcano_viewer::platform::{InputEvent, KeyCode};
use volcano_viewer::render::graph::{PolygonMode, RenderCommand};
use volcano_viewer::render::particles::{Particle, ParticleSystem};
use volcano_viewer::render::terrain::{generate_scene_mesh, VolcanoParams};
use volcano_viewer::scene::Camera;

fn seeded_config(emitting: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.particles.seed = Some(42);
    config.particles.emitting = emitting;
    config
}

#[test]
fn test_default_volcano_mesh() {
    let mesh = generate_scene_mesh(&VolcanoParams::default());
    assert_eq!(mesh.triangle_count(), 1186);
    assert_eq!(mesh.positions().len(), 10674);
    assert_eq!(mesh.positions().len(), mesh.normals().len());
    assert!(mesh.positions().iter().all(|v| v.is_finite()));
    assert!(mesh.normals().iter().all(|v| v.is_finite()));
    assert_eq!(
        generate_scene_mesh(&VolcanoParams::default()).positions(),
        mesh.positions()
    );
}

#[test]
fn test_one_second_of_eruption() {
    let config = seeded_config(true);
    let mut particles = ParticleSystem::new(&config.particles, Vec3::new(0.0, 2.5, 0.0));
    for _ in 0..60 {
        particles.update(1.0 / 60.0);
    }
    let alive = particles.alive_lava() as i64;
    assert!((alive - 300).abs() <= 10, "alive lava = {}", alive);
}

#[test]
fn test_single_particle_ground_impact() {
    let config = seeded_config(false);
    let mut particles = ParticleSystem::new(&config.particles, Vec3::ZERO);
    assert!(particles.spawn_lava(Particle::spawn(
        Vec3::ZERO,
        Vec3::ZERO,
        10.0,
        0.2,
        Vec4::new(1.0, 0.3, 0.0, 1.0),
    )));

    let dt = 0.1;
    let mut impacted = false;
    for _ in 0..20 {
        let before = particles.lava().iter_alive().next().map(|p| p.velocity.y);
        particles.update(dt);
        if particles.alive_smoke() > 0 {
            let vy_before = before.unwrap_or_default() + -8.0 * dt;
            let lava = particles.lava().iter_alive().next().copied();
            let lava = lava.expect("lava particle still alive after impact");
            assert_eq!(lava.position.y, -0.5);
            assert!((lava.velocity.y - (-0.2 * vy_before)).abs() < 1e-4);

            let puff = particles.smoke().iter_alive().next().copied();
            let puff = puff.expect("impact puff spawned");
            assert!(puff.position.distance(lava.position) < 0.001);
            impacted = true;
            break;
        }
        let y = particles.lava().iter_alive().next().map(|p| p.position.y);
        assert!(y.unwrap_or(0.0) >= -0.5);
    }
    assert!(impacted);
}

#[test]
fn test_transform_centers_volcano_axis() {
    let camera = Camera::default();
    assert!(camera.is_perspective);
    assert_eq!(camera.zoom, 1.0);
    let clip = camera.transform(1.5) * Vec4::new(0.0, -0.5, 0.0, 1.0);
    assert!((clip.x / clip.w).abs() < 0.01);
}

#[test]
fn test_wireframe_toggle_changes_polygon_mode() {
    let mut app = App::new(&seeded_config(true));
    app.update(1.0 / 60.0);

    app.handle_event(&InputEvent::key_pressed(KeyCode::M));
    let graph = app.frame_graph([0.2, 0.2, 0.2, 1.0]);
    assert_eq!(graph.polygon_mode(), Some(PolygonMode::Line));

    app.handle_event(&InputEvent::key_released(KeyCode::M));
    app.handle_event(&InputEvent::key_pressed(KeyCode::M));
    let graph = app.frame_graph([0.2, 0.2, 0.2, 1.0]);
    assert_eq!(graph.polygon_mode(), Some(PolygonMode::Fill));
}

#[test]
fn test_clear_kills_everything() {
    let mut app = App::new(&seeded_config(false));
    for i in 0..500 {
        let x = i as f32 * 0.001;
        app.particles.spawn_lava(Particle::spawn(
            Vec3::new(x, 1.0, 0.0),
            Vec3::ZERO,
            5.0,
            0.2,
            Vec4::new(1.0, 0.3, 0.0, 1.0),
        ));
    }
    assert_eq!(app.particles.alive_lava(), 500);

    assert_eq!(
        app.handle_event(&InputEvent::key_pressed(KeyCode::C)),
        Some(Command::ClearParticles)
    );
    app.update(1.0 / 60.0);

    assert!(app.particles.lava().slots().iter().all(|p| !p.alive));
    assert!(app.particles.smoke().slots().iter().all(|p| !p.alive));
    assert!(app.stream().is_empty());

    let graph = app.frame_graph([0.2, 0.2, 0.2, 1.0]);
    assert!(!graph
        .commands
        .iter()
        .any(|c| matches!(c, RenderCommand::DrawParticles { .. })));
}

#[test]
fn test_config_file_drives_app() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("volcano.toml");
    std::fs::write(
        &path,
        "[particles]\nbase_emit_rate = 600\nseed = 3\n\n[camera]\nwireframe = true\n",
    )
    .expect("write config");

    let config = AppConfig::from_file(&path).expect("load config");
    config.validate().expect("valid config");
    let mut app = App::new(&config);
    assert_eq!(app.particles.base_emit_rate(), 600);

    app.update(0.1);
    let alive = app.particles.alive_lava() as i64;
    assert!((alive - 60).abs() <= 1, "alive lava = {}", alive);
    assert_eq!(
        app.frame_graph(config.graphics.clear_color).polygon_mode(),
        Some(PolygonMode::Line)
    );
}
