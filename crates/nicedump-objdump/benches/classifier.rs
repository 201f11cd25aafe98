//! Benchmarks for listing classification and rewriting.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use nicedump_objdump::{classify, parse_disassembly, rewrite_instruction};

/// One symbol's worth of listing: prologue, arithmetic, a call, a
/// PC-relative load and an epilogue.
const FUNCTION: &str = "\
0000000000000000 <_D6kernel3vga4putcFaZv>:
   0:\t55                   \tpush   %rbp
   1:\t48 89 e5             \tmov    %rsp,%rbp
   4:\t48 83 ec 20          \tsub    $0x20,%rsp
   8:\t48 89 7d f8          \tmov    %rdi,-0x8(%rbp)
   c:\t48 8b 05 00 00 00 00 \tmov    0x200b8d(%rip),%rax        # 0000000000601040 <_D6kernel3vga6bufferPt>
  13:\t48 83 c0 01          \tadd    $0x1,%rax
  17:\te8 00 00 00 00       \tcallq  1c <_D6kernel3vga6scrollFZv>
  1c:\t7e 07                \tjle    25 <_D6kernel3vga4putcFaZv+0x25>
  1e:\tb8 01 00 00 00       \tmov    $0x1,%eax
  23:\teb 05                \tjmp    2a <_D6kernel3vga4putcFaZv+0x2a>
  25:\tb8 00 00 00 00       \tmov    $0x0,%eax
  2a:\t48 83 c4 20          \tadd    $0x20,%rsp
  2e:\t5d                   \tpop    %rbp
  2f:\tc3                   \tretq
";

/// A listing of `count` symbols at consecutive addresses.
fn generate_listing(count: usize) -> String {
    let mut listing =
        String::from("kernel.o:     file format elf64-x86-64\n\nDisassembly of section .text:\n\n");
    for i in 0..count {
        let base = (i as u64) * 0x30;
        listing.push_str(&format!("{:016x} <_D6kernel3vga4putcFaZv>:\n", base));
        for line in FUNCTION.lines().skip(1) {
            let (addr, rest) = line.split_once(':').unwrap();
            let offset = u64::from_str_radix(addr.trim(), 16).unwrap();
            listing.push_str(&format!("{:>6x}:{}\n", base + offset, rest));
        }
        listing.push('\n');
    }
    listing
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("symbol_label", |b| {
        b.iter(|| classify(black_box("0000000000400120 <_D6kernel4mainFZv>:")))
    });

    group.bench_function("instruction", |b| {
        b.iter(|| classify(black_box("   1:\t48 89 e5             \tmov    %rsp,%rbp")))
    });

    group.finish();
}

fn bench_rewrite(c: &mut Criterion) {
    let mut group = c.benchmark_group("rewrite");

    group.bench_function("branch", |b| {
        b.iter(|| rewrite_instruction(black_box("callq  1c <_D6kernel3vga6scrollFZv>")))
    });

    group.bench_function("literals", |b| {
        b.iter(|| rewrite_instruction(black_box("movabs $0xffffffffffffffff,%rax")))
    });

    group.bench_function("pic", |b| {
        b.iter(|| {
            rewrite_instruction(black_box(
                "mov    0x200b8d(%rip),%rax        # 0000000000601040 <_D6kernel3vga6bufferPt>",
            ))
        })
    });

    group.finish();
}

fn bench_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("listing");

    for count in [1, 16, 256, 1024] {
        let listing = generate_listing(count);
        group.throughput(Throughput::Bytes(listing.len() as u64));
        group.bench_with_input(BenchmarkId::new("throughput", count), &listing, |b, listing| {
            b.iter(|| parse_disassembly(black_box(listing)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_rewrite, bench_listing);
criterion_main!(benches);
