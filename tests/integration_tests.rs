//! End-to-end checks of the transform kernel and the frame pipeline built on it.

use quadrix::numerics::{Matrix, Point3};
use quadrix::quadric::{self, transform_plane, transform_quadric, HalfSpace, SurfacePiece, WorldSurfaces};
use quadrix::scene::{FrameClock, ObjectConfig, Scene, SceneConfig, SceneObject, ShapeKind};
use quadrix::transform::{self, inverse, rotate_x, rotate_y, rotate_z, translate};
use quadrix::{uniform_channel, FrameUniforms, UniformChannelConfig, Vector3};

const EPS: f64 = 1e-9;

fn sample_matrix(h: usize, w: usize, seed: f64) -> Matrix<f64> {
    let values: Vec<f64> = (0..h * w).map(|k| ((k as f64 + 1.0) * seed).sin() * 3.0).collect();
    Matrix::from_flat_list(h, w, values).unwrap()
}

fn sample_transform(t: f64) -> Matrix<f64> {
    let rotation = Matrix::multiply(&rotate_z(0.4 * t), &Matrix::multiply(&rotate_x(t), &rotate_y(1.7 * t)).unwrap()).unwrap();
    transform::place(Vector3::new(t, -2.0 * t, 0.5), &rotation, Vector3::new(1.5, 0.25, 2.0)).unwrap()
}

mod kernel_properties {
    use super::*;

    #[test]
    fn test_identity_law() {
        for (h, w) in [(4, 4), (4, 1), (4, 7)] {
            let a = sample_matrix(h, w, 0.37);
            let left = Matrix::multiply(&Matrix::identity(h), &a).unwrap();
            assert!(left.approx_eq(&a, EPS));
        }
        let a = sample_matrix(3, 4, 1.1);
        assert!(Matrix::multiply(&a, &transform::identity()).unwrap().approx_eq(&a, EPS));
    }

    #[test]
    fn test_inverse_law() {
        for &t in &[0.0, 0.3, 1.0, 2.5, -4.2] {
            let m = sample_transform(t);
            let product = Matrix::multiply(&m, &inverse(&m).unwrap()).unwrap();
            assert!(product.approx_eq(&transform::identity(), EPS), "t = {}", t);
        }
    }

    #[test]
    fn test_inverse_of_projective_matrix() {
        let m = Matrix::multiply(&transform::perspective(0.0, 0.0, 0.5, 1.0), &translate(0.0, 0.0, 2.0)).unwrap();
        let product = Matrix::multiply(&inverse(&m).unwrap(), &m).unwrap();
        assert!(product.approx_eq(&transform::identity(), EPS));
    }

    #[test]
    fn test_transpose_involution() {
        for (h, w) in [(1, 4), (3, 5), (4, 4)] {
            let a = sample_matrix(h, w, 0.9);
            assert_eq!(a.transpose().transpose(), a);
        }
    }

    #[test]
    fn test_associativity() {
        let a = sample_matrix(2, 3, 0.3);
        let b = sample_matrix(3, 4, 0.7);
        let c = sample_matrix(4, 2, 1.3);
        let left = Matrix::multiply(&Matrix::multiply(&a, &b).unwrap(), &c).unwrap();
        let right = Matrix::multiply(&a, &Matrix::multiply(&b, &c).unwrap()).unwrap();
        assert!(left.approx_eq(&right, 1e-12));
    }

    #[test]
    fn test_rotations_are_proper_orthogonal() {
        for &theta in &[0.0, 0.5, 1.0, 3.0, -2.2] {
            for r in [rotate_x(theta), rotate_y(theta), rotate_z(theta)] {
                let rrt = Matrix::multiply(&r, &r.transpose()).unwrap();
                assert!(rrt.approx_eq(&transform::identity(), EPS));
                let det = transform::determinant(&r).unwrap();
                assert!((det - 1.0).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_translated_sphere_keeps_its_surface() {
        let r = 0.75;
        let q = Matrix::diagonal(4, &[1.0, 1.0, 1.0, -r * r]).unwrap();
        let m = translate(1.0, -2.0, 0.5);
        let world = transform_quadric(&q, &inverse(&m).unwrap()).unwrap();
        for k in 0..12 {
            let a = k as f64 * 0.5;
            let canonical = Matrix::column_vector(&[r * a.cos() * 0.6, r * a.sin() * 0.6, r * 0.8, 1.0]);
            let p = Matrix::multiply(&m, &canonical).unwrap();
            let value = Matrix::multiply(&p.transpose(), &Matrix::multiply(&world, &p).unwrap()).unwrap();
            assert!(value[(0, 0)].abs() < EPS);
        }
    }

    #[test]
    fn test_planes_follow_the_transform() {
        let m = sample_transform(0.8);
        let inv = inverse(&m).unwrap();
        let plane = Matrix::row_vector(&[0.0, 0.0, 1.0, -0.2]);
        let world = transform_plane(&plane, &inv).unwrap();
        let on_plane = Matrix::column_vector(&[0.3, -0.1, 0.2, 1.0]);
        let p = Matrix::multiply(&m, &on_plane).unwrap();
        assert!(Matrix::multiply(&world, &p).unwrap()[(0, 0)].abs() < EPS);
    }

    #[test]
    fn test_dimension_mismatches() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(4, 5);
        assert!(Matrix::multiply(&a, &b).unwrap_err().is_dimension_mismatch());
        assert!(Matrix::from_flat_list(2, 2, vec![1.0f64, 2.0, 3.0]).unwrap_err().is_dimension_mismatch());
        assert!(Matrix::add(&a, &b).unwrap_err().is_dimension_mismatch());
        assert!(inverse(&a).unwrap_err().is_dimension_mismatch());
        assert!(transform_quadric(&a, &transform::identity()).unwrap_err().is_dimension_mismatch());
    }

    #[test]
    fn test_singular_inverse_is_an_error() {
        let err = inverse(&transform::scale(1.0f64, 0.0, 1.0)).unwrap_err();
        assert!(err.is_singular());
        let mut nan = transform::identity::<f64>();
        nan.set(0, 3, f64::NAN);
        assert!(inverse(&nan).unwrap_err().is_singular());
    }

    #[test]
    fn test_translation_wire_layout() {
        let m = translate(1.0f64, 2.0, 3.0);
        let expected = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 2.0, 3.0, 1.0];
        assert_eq!(m.to_flat_list(), expected);
        let inv = inverse(&m).unwrap();
        let reference = translate(-1.0, -2.0, -3.0).to_flat_list();
        for (a, b) in inv.to_flat_list().iter().zip(reference.iter()) {
            assert!((a - b).abs() < EPS);
        }
    }

    #[test]
    fn test_world_surfaces_of_rotated_cube() {
        let m = sample_transform(1.3);
        let world = WorldSurfaces::compute(m.clone(), &quadric::cube(0.5)).unwrap();
        assert_eq!(world.pieces.len(), 6);
        let inside = transform::transform_point(&m, Point3::new(0.1, -0.2, 0.3)).unwrap();
        let outside = transform::transform_point(&m, Point3::new(0.6, 0.0, 0.0)).unwrap();
        assert!(world.contains(inside));
        assert!(!world.contains(outside));

        let face = SurfacePiece::from(HalfSpace::new(1.0, 0.0, 0.0, -0.5));
        let on_face = transform::transform_point(&m, Point3::new(0.5, 0.2, -0.1)).unwrap();
        assert!(face.transformed(&world.inverse).unwrap().evaluate(on_face).abs() < EPS);
    }
}

mod frame_pipeline {
    use super::*;

    #[test]
    fn test_config_to_uniforms() {
        let toml = r#"
            [camera]
            eye = [0.0, 1.0, 6.0]

            [[objects]]
            name = "ball"
            shape = "sphere"
            radius = 0.5
            motion.x = { amplitude = 1.0, frequency = 2.0, wave = "cos" }

            [[objects]]
            name = "gem"
            shape = "octahedron"
            radius = 0.3
            spin = [1.0, 0.5, 0.0]
            rotation_order = "yx"

            [[lights]]
            rgb = [1.0, 0.5, 0.25]
        "#;
        let config = SceneConfig::from_toml_str(toml).unwrap();
        let scene = Scene::from_config(&config).unwrap();

        let mut clock = FrameClock::new();
        clock.tick(10_000.0, [0.0; 3]);
        let input = clock.tick(10_500.0, [0.2, -0.4, 1.0]);
        let report = scene.evaluate_frame(&input);
        assert!(report.is_complete());

        let frame = &report.uniforms;
        assert_eq!(frame.frame, 1);
        assert_eq!(frame.time, 0.5);
        assert_eq!(frame.cursor, [0.2, -0.4, 1.0]);
        assert_eq!(frame.eye, [0.0, 1.0, 6.0]);
        assert_eq!(frame.lights[0].rgb, [1.0, 0.5, 0.25]);
        assert_eq!(frame.materials.len(), 1);
        assert_eq!(frame.materials[0].power, 20.0);

        let ball = frame.object("ball").unwrap();
        assert_eq!(ball.center[0], 1.0f64.cos() as f32);
        assert_eq!(ball.quadrics.len(), 1);

        let gem = frame.object("gem").unwrap();
        assert_eq!(gem.plane_count(), 8);
        assert_eq!(gem.type_code(), 1);

        let m = Matrix::from_flat_list(4, 4, gem.model.to_vec()).unwrap();
        let m_inv = Matrix::from_flat_list(4, 4, gem.inverse_model.to_vec()).unwrap();
        let product = Matrix::multiply(&m, &m_inv).unwrap();
        assert!(product.approx_eq(&transform::identity(), 1e-5));
    }

    #[test]
    fn test_bad_object_does_not_stop_the_frame() {
        let mut scene = Scene::from_config(&SceneConfig::demo()).unwrap();
        let degenerate = SceneObject::from_config(&ObjectConfig::new("pancake", ShapeKind::Cube, 0.5))
            .unwrap()
            .with_scale(Vector3::new(0.0, 1.0, 1.0));
        scene.push_object(degenerate);

        let report = scene.evaluate_frame_parallel(&quadrix::FrameInput::at(0.25), 3);
        assert_eq!(report.uniforms.objects.len(), 4);
        assert!(report.uniforms.object("pancake").is_none());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].error.is_singular());
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let duplicate = r#"
            [[objects]]
            name = "a"
            shape = "sphere"

            [[objects]]
            name = "a"
            shape = "cube"
        "#;
        assert!(SceneConfig::from_toml_str(duplicate).is_err());

        let missing_material = r#"
            [[materials]]
            power = 10.0

            [[objects]]
            name = "a"
            shape = "sphere"
            material = 4
        "#;
        assert!(SceneConfig::from_toml_str(missing_material).is_err());
        assert!(SceneConfig::load("/nonexistent/scene.toml").is_err());
    }

    #[tokio::test]
    async fn test_frames_stream_to_consumer() {
        let scene = Scene::from_config(&SceneConfig::demo()).unwrap();
        let (tx, rx) = uniform_channel(UniformChannelConfig::bounded(8));

        let consumer = tokio::spawn(async move {
            let mut frames: Vec<FrameUniforms> = Vec::new();
            while let Some(frame) = rx.next_frame().await {
                frames.push(frame);
            }
            frames
        });

        let mut clock = FrameClock::new();
        for n in 0..5 {
            let input = clock.tick(f64::from(n) * 16.0, [0.0; 3]);
            tx.publish(scene.evaluate_frame(&input).uniforms).await.unwrap();
        }
        tx.close();

        let frames = consumer.await.unwrap();
        assert_eq!(frames.len(), 5);
        assert_eq!(frames.iter().map(|f| f.frame).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
        let bytes = frames[4].encode().unwrap();
        assert_eq!(FrameUniforms::decode(&bytes).unwrap(), frames[4]);
    }
}
