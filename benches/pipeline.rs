use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rastly::color;
use rastly::math::vec2::Vec2;
use rastly::math::vec3::Vec3;
use rastly::mesh::{Face, Mesh};
use rastly::render::Pipeline;
use rastly::texture::Texture;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;

/// One front-facing triangle at view depth 10, scaled by `s` view units.
fn triangle_mesh(s: f32) -> Mesh {
    let mut mesh = Mesh::new();
    mesh.vertices = vec![
        Vec3::new(-s, -s, -10.0),
        Vec3::new(s, -s, -10.0),
        Vec3::new(0.0, s, -10.0),
    ];
    mesh.texcoords = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.5, 1.0),
    ];
    mesh.faces = vec![Face {
        positions: vec![0, 1, 2],
        texcoords: vec![0, 1, 2],
        normals: vec![],
    }];
    mesh
}

/// A 20x20 grid of quads (800 triangles) filling the view at depth 10.
fn grid_mesh() -> Mesh {
    const N: usize = 20;
    let mut mesh = Mesh::new();
    let extent = 4.0f32;
    let step = 2.0 * extent / N as f32;

    for row in 0..=N {
        for col in 0..=N {
            let x = -extent + col as f32 * step;
            let y = -extent + row as f32 * step;
            mesh.vertices.push(Vec3::new(x, y, -10.0));
            mesh.texcoords
                .push(Vec2::new(col as f32 / N as f32, row as f32 / N as f32));
        }
    }

    let stride = N + 1;
    for row in 0..N {
        for col in 0..N {
            let a = row * stride + col;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            // both triangles wound clockwise in screen space
            for corners in [[a, b, c], [b, d, c]] {
                mesh.faces.push(Face {
                    positions: corners.to_vec(),
                    texcoords: corners.to_vec(),
                    normals: vec![],
                });
            }
        }
    }
    mesh
}

fn checker_texture() -> Texture {
    const SIZE: u32 = 64;
    let mut data = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let on = (x / 8 + y / 8) % 2 == 0;
            let v = if on { 255 } else { 32 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    Texture::from_rgba8(SIZE, SIZE, data).unwrap()
}

fn new_pipeline() -> Pipeline {
    let mut pipeline = Pipeline::new(BUFFER_WIDTH, BUFFER_HEIGHT).unwrap();
    pipeline.set_projection();
    pipeline
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");

    for (name, scale) in [("small", 0.2f32), ("medium", 2.0), ("large", 4.0)] {
        let mesh = triangle_mesh(scale);

        group.bench_with_input(BenchmarkId::new("flat", name), &mesh, |b, mesh| {
            let mut pipeline = new_pipeline();
            b.iter(|| {
                pipeline.clear(color::BACKGROUND);
                pipeline.render(black_box(mesh));
            });
        });

        group.bench_with_input(BenchmarkId::new("textured", name), &mesh, |b, mesh| {
            let mut pipeline = new_pipeline();
            pipeline.set_texture(checker_texture());
            b.iter(|| {
                pipeline.clear(color::BACKGROUND);
                pipeline.render(black_box(mesh));
            });
        });
    }

    group.finish();
}

fn benchmark_mesh_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_grid");
    let mesh = grid_mesh();

    group.bench_function("flat_800_triangles", |b| {
        let mut pipeline = new_pipeline();
        b.iter(|| {
            pipeline.clear(color::BACKGROUND);
            pipeline.render(black_box(&mesh));
        });
    });

    group.bench_function("textured_800_triangles", |b| {
        let mut pipeline = new_pipeline();
        pipeline.set_texture(checker_texture());
        b.iter(|| {
            pipeline.clear(color::BACKGROUND);
            pipeline.render(black_box(&mesh));
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_triangle, benchmark_mesh_grid);
criterion_main!(benches);
