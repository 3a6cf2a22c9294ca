//! This bench test simulates rewriting the links in a large documentation
//! tree, as the pre-publish step would during a CI run.

#![allow(missing_docs)]

use std::{fs, path::Path};

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::TempDir;
use wikify::{Directory, LinkStyle, Rewriter};

/// Generates a deep tree of markdown files full of relative links
fn preseed_tree(root: &Path) {
    for section in 0..10 {
        let dir = root.join(format!("section-{section}")).join("pages");
        fs::create_dir_all(&dir).unwrap();
        for page in 0..20 {
            let mut content = String::new();
            for line in 0..20 {
                content.push_str(&format!(
                    "Paragraph {line}, see [related](../other/Page-{page}.md) for more.\n"
                ));
            }
            fs::write(dir.join(format!("page-{page}.md")), content).unwrap();
        }
    }
}

fn rewrite_tree(c: &mut Criterion) {
    c.bench_function("rewrite tree", |b| {
        b.iter_batched(
            || {
                // Setup: create a tree with unrewritten links
                let tmp_dir = TempDir::new().unwrap();
                preseed_tree(tmp_dir.path());
                tmp_dir
            },
            |tmp_dir| {
                let directory = Directory::new(tmp_dir.path().to_path_buf()).unwrap();
                directory
                    .rewrite_all(&Rewriter::new(LinkStyle::Legacy))
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, rewrite_tree);
criterion_main!(benches);
