//! Criterion benchmarks for entropy encoding.
//!
//! Blocks come from a synthetic image run through DCT and quantization so the
//! coefficient distribution resembles real content.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use seqjpeg::bitstream::VecBitWriter;
use seqjpeg::block::Block;
use seqjpeg::dct::forward_dct;
use seqjpeg::entropy::{DcPredictor, EntropyEncoder};
use seqjpeg::huffman::HuffmanTables;
use seqjpeg::quant::{QuantizedBlock, Quantizer};
use seqjpeg::types::{ComponentType, Quality, TableClass};

/// Quantized luma blocks of a noisy gradient.
fn quantized_blocks(count: usize, quality: u8) -> Vec<QuantizedBlock> {
    let quantizer = Quantizer::new(Quality::new(quality).unwrap());
    (0..count)
        .map(|n| {
            let mut samples = [0u8; 64];
            for (i, v) in samples.iter_mut().enumerate() {
                let (x, y) = (i % 8, i / 8);
                let noise = ((n * 31 + x * 7 + y * 13) % 40) as u8;
                *v = ((x * 16 + y * 8 + n) % 200) as u8 + noise;
            }
            quantizer.quantize(&forward_dct(&Block(samples)), TableClass::Luma)
        })
        .collect()
}

fn bench_encode_blocks(c: &mut Criterion) {
    let tables = HuffmanTables::new().unwrap();

    let mut group = c.benchmark_group("entropy");
    group.throughput(Throughput::Elements(1024));

    for quality in [50u8, 80, 95] {
        let blocks = quantized_blocks(1024, quality);
        group.bench_with_input(BenchmarkId::new("encode_region", quality), &blocks, |b, blocks| {
            b.iter(|| {
                let mut writer = VecBitWriter::new_vec();
                let mut encoder = EntropyEncoder::new(&mut writer, &tables);
                encoder
                    .encode_region(DcPredictor::new(), ComponentType::Y, black_box(blocks))
                    .unwrap();
                encoder.flush().unwrap();
                writer.into_bytes()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode_blocks);
criterion_main!(benches);
