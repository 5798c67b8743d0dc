// Flatgram - Hierarchical Flat-File Record Grammar
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Sequencing throughput benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flatgram_core::{RecordCandidate, Sequencer};
use flatgram_test::{batch_tree, ordered_choice_tree};

fn batch_candidates(details: usize) -> Vec<(Vec<String>, String, usize)> {
    let mut lines = vec!["H,1".to_string()];
    lines.extend((0..details).map(|i| format!("D,{}", i)));
    lines.push(format!("T,{}", details));
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let fields = line.split(',').map(str::to_string).collect();
            (fields, line, i + 1)
        })
        .collect()
}

fn bench_batch(c: &mut Criterion) {
    let tree = batch_tree();
    let mut group = c.benchmark_group("batch");
    for details in [10usize, 1_000, 10_000] {
        let input = batch_candidates(details);
        group.throughput(Throughput::Elements(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(details), &input, |b, input| {
            b.iter(|| {
                let mut session = Sequencer::new(&tree);
                for (fields, text, line) in input.iter().cloned() {
                    let candidate = RecordCandidate::identify(&tree, fields, text, line);
                    black_box(session.accept(candidate).ok());
                }
                black_box(session.finish().ok())
            })
        });
    }
    group.finish();
}

fn bench_identify(c: &mut Criterion) {
    let tree = ordered_choice_tree();
    let fields = ["D", "100"];
    c.bench_function("identify/alternatives", |b| {
        b.iter(|| black_box(tree.identify(black_box(&fields))))
    });
}

criterion_group!(benches, bench_batch, bench_identify);
criterion_main!(benches);
