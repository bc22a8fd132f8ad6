//! Benchmarks for semantic type identifier decoding and encoding
//!
//! Covers the hot path of every resolved stream descriptor:
//! - Decoding a 64-bit identifier into base and content fields
//! - Re-encoding a decoded type
//! - Base-type compatibility checks
//!
//! Platform: Cross-platform (pure computation, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tcnart::semantic_type::{
    self, BaseType, CardinalityType, ContainerType, ContentConfig, GeometryContentConfig,
    ImageCompressionType, ImageContentConfig, ImageFormatType, MemoryRepresentationType,
    ScalarType, SemanticType,
};

fn sample_identifiers() -> Vec<(&'static str, u64)> {
    let mut depth = SemanticType::new(BaseType::new(
        ScalarType::UInt16,
        CardinalityType::Fixed,
        ContainerType::Array2D,
        MemoryRepresentationType::Compressed,
    ));
    depth.content = ContentConfig::Image(ImageContentConfig {
        compression: ImageCompressionType::Zdepth,
        format: ImageFormatType::Depth,
        ..Default::default()
    });

    let mut cloud = SemanticType::new(BaseType::new(
        ScalarType::Float32,
        CardinalityType::Variable,
        ContainerType::Array1D,
        MemoryRepresentationType::Raw,
    ));
    cloud.content = ContentConfig::Geometry(GeometryContentConfig::default());

    vec![
        ("depth_image", semantic_type::encode(&depth)),
        ("point_cloud", semantic_type::encode(&cloud)),
        ("base_only", 0x0000_0000_0001_8348),
        ("unknown_content", 0x0000_00FF_0000_8348),
    ]
}

fn bench_decode(c: &mut Criterion) {
    let ids = sample_identifiers();

    let mut group = c.benchmark_group("semantic_type_decode");
    group.throughput(Throughput::Elements(1));
    for (name, id) in &ids {
        group.bench_with_input(BenchmarkId::from_parameter(name), id, |b, &id| {
            b.iter(|| black_box(semantic_type::decode(black_box(id))))
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let decoded: Vec<_> =
        sample_identifiers().into_iter().map(|(name, id)| (name, semantic_type::decode(id))).collect();

    let mut group = c.benchmark_group("semantic_type_encode");
    for (name, st) in &decoded {
        group.bench_with_input(BenchmarkId::from_parameter(name), st, |b, st| {
            b.iter(|| black_box(semantic_type::encode(black_box(st))))
        });
    }
    group.finish();
}

fn bench_compatibility(c: &mut Criterion) {
    let ids = sample_identifiers();
    let st = semantic_type::decode(ids[0].1);
    let same_base = st.base.identifier();
    let other_base = semantic_type::decode(ids[1].1).base.identifier();

    c.bench_function("is_compatible_match", |b| {
        b.iter(|| black_box(st.is_compatible(black_box(same_base))))
    });
    c.bench_function("is_compatible_mismatch", |b| {
        b.iter(|| black_box(st.is_compatible(black_box(other_base))))
    });
}

criterion_group!(benches, bench_decode, bench_encode, bench_compatibility);
criterion_main!(benches);
