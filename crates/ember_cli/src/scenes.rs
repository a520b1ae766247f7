//! Hard-coded demo scenes.
//!
//! Each builder returns the scene root (a BVH over the object list) and
//! a camera configured for it. Sampling counts and resolution are
//! overridden afterwards from the command line.

use ember_math::Vec3;
use ember_renderer::{
    make_box, mesh_to_triangles, BvhNode, Camera, Dielectric, DiffuseLight, HittableList,
    Lambertian, Metal, Quad, RotateY, Sphere, Translate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;

pub struct Scene {
    pub world: BvhNode,
    pub camera: Camera,
}

/// Five colored quads facing the camera.
pub fn quads() -> Scene {
    let mut world = HittableList::new();

    let left_red = Lambertian::new(Vec3::new(1.0, 0.2, 0.2));
    let back_green = Lambertian::new(Vec3::new(0.2, 1.0, 0.2));
    let right_blue = Lambertian::new(Vec3::new(0.2, 0.2, 1.0));
    let upper_orange = Lambertian::new(Vec3::new(1.0, 0.5, 0.0));
    let lower_teal = Lambertian::new(Vec3::new(0.2, 0.8, 0.8));

    world.add(Box::new(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    )));

    let camera = Camera::new()
        .with_resolution(400, 1.0)
        .with_position(Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y)
        .with_lens(80.0, 0.0, 10.0)
        .with_background(Vec3::new(0.70, 0.80, 1.00));

    Scene {
        world: BvhNode::from_list(world),
        camera,
    }
}

/// The bouncing-spheres cover scene: a ground sphere, a randomized grid
/// of small diffuse/metal/glass spheres, and three hero spheres.
pub fn cover(seed: u64) -> Scene {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = HittableList::new();

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Lambertian::new(Vec3::splat(0.5)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = Vec3::new(rng.gen(), rng.gen(), rng.gen())
                    * Vec3::new(rng.gen(), rng.gen(), rng.gen());
                world.add(Box::new(Sphere::new(center, 0.2, Lambertian::new(albedo))));
            } else if choose_mat < 0.95 {
                let albedo = Vec3::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                let fuzz = rng.gen_range(0.0..0.5);
                world.add(Box::new(Sphere::new(center, 0.2, Metal::new(albedo, fuzz))));
            } else {
                world.add(Box::new(Sphere::new(center, 0.2, Dielectric::new(1.5))));
            }
        }
    }

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Dielectric::new(1.5),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Lambertian::new(Vec3::new(0.4, 0.2, 0.1)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Metal::new(Vec3::new(0.7, 0.6, 0.5), 0.0),
    )));

    let camera = Camera::new()
        .with_resolution(1200, 16.0 / 9.0)
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.6, 10.0)
        .with_background(Vec3::new(0.70, 0.80, 1.00));

    Scene {
        world: BvhNode::from_list(world),
        camera,
    }
}

/// Cornell box with a glass sphere, a rotated metal box and an optional
/// OBJ mesh. A missing mesh file is logged and replaced by an empty
/// list so the render still proceeds.
pub fn cornell(mesh: Option<&Path>, mesh_scale: f32) -> Scene {
    let mut world = HittableList::new();

    let red = Lambertian::new(Vec3::new(0.65, 0.05, 0.05));
    let white = Lambertian::new(Vec3::new(0.73, 0.73, 0.73));
    let green = Lambertian::new(Vec3::new(0.12, 0.45, 0.15));
    let pink = Lambertian::new(Vec3::new(0.99, 0.75, 0.80));
    let light = DiffuseLight::new(Vec3::splat(15.0));
    let glass = Dielectric::new(1.5);
    let blue_metal = Metal::new(Vec3::new(0.54, 0.81, 0.94), 0.7);

    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    world.add(Box::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));
    world.add(Box::new(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(555.0, 555.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    )));
    world.add(Box::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    )));

    world.add(Box::new(Sphere::new(
        Vec3::new(350.0, 40.0, 100.0),
        40.0,
        glass,
    )));

    let tall_box = make_box(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), blue_metal);
    let tall_box = RotateY::new(Box::new(tall_box), 20.0);
    let tall_box = Translate::new(Box::new(tall_box), Vec3::new(265.0, 0.0, 350.0));
    world.add(Box::new(tall_box));

    if let Some(path) = mesh {
        let triangles = match ember_core::load_obj(path) {
            Ok(mesh) => mesh_to_triangles(&mesh, mesh_scale, pink),
            Err(e) => {
                log::error!("failed to load OBJ mesh {}: {e}", path.display());
                HittableList::new()
            }
        };
        if !triangles.is_empty() {
            let mesh_root = BvhNode::from_list(triangles);
            let mesh_root = RotateY::new(Box::new(mesh_root), 180.0);
            let mesh_root = Translate::new(Box::new(mesh_root), Vec3::new(160.0, -60.0, 230.0));
            world.add(Box::new(mesh_root));
        }
    }

    let camera = Camera::new()
        .with_resolution(600, 1.0)
        .with_position(
            Vec3::new(278.0, 278.0, -760.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_background(Vec3::ZERO);

    Scene {
        world: BvhNode::from_list(world),
        camera,
    }
}
