use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dump2sqlite::convert::{convert_create_table, convert_statement};
use dump2sqlite::parser::{strip_comment_lines, StatementSplitter};
use dump2sqlite::plan::StatementPlan;
use dump2sqlite::schema::SchemaFilter;
use std::hint::black_box;

fn generate_dump(num_statements: usize) -> String {
    let mut data = String::new();

    data.push_str("-- phpMyAdmin SQL Dump\n");
    data.push_str("/*!40101 SET NAMES utf8 */;\n");
    data.push_str("USE `chiamogna`;\n");
    data.push_str(
        "CREATE TABLE `users` (\n  `id` int(11) NOT NULL AUTO_INCREMENT,\n  `name` varchar(255) NOT NULL,\n  `email` varchar(255) DEFAULT NULL,\n  PRIMARY KEY (`id`),\n  UNIQUE KEY `email` (`email`)\n) ENGINE=MyISAM DEFAULT CHARSET=latin1;\n",
    );

    for i in 0..num_statements {
        data.push_str(&format!(
            "INSERT INTO `users` VALUES ({}, 'User; {}', 'user{}@example.com');\n",
            i, i, i
        ));
    }

    data
}

fn bench_split_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("splitter_throughput");

    for size in [1000, 10000, 50000] {
        let data = strip_comment_lines(&generate_dump(size));

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("split", format!("{}_stmts", size)),
            &data,
            |b, data| b.iter(|| black_box(StatementSplitter::new(data).count())),
        );
    }

    group.finish();
}

fn bench_strip_comments(c: &mut Criterion) {
    let data = generate_dump(10000);

    let mut group = c.benchmark_group("strip_comments");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("strip_comment_lines", |b| {
        b.iter(|| black_box(strip_comment_lines(black_box(&data))))
    });
    group.finish();
}

fn bench_plan(c: &mut Criterion) {
    let data = strip_comment_lines(&generate_dump(10000));
    let filter = SchemaFilter::new(Some(["chiamogna"]), false);

    let mut group = c.benchmark_group("statement_plan");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("plan_10000_stmts", |b| {
        b.iter(|| black_box(StatementPlan::new(&data, &filter).count()))
    });
    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let create = "CREATE TABLE `users` (\n  `id` int(11) unsigned NOT NULL AUTO_INCREMENT,\n  `kind` enum('a','b') NOT NULL DEFAULT 'a',\n  `score` double DEFAULT NULL,\n  PRIMARY KEY (`id`),\n  UNIQUE KEY `kind` (`kind`),\n  KEY `score` (`score`)\n) ENGINE=MyISAM DEFAULT CHARSET=latin1 AUTO_INCREMENT=42";
    let insert = "INSERT INTO `users` (`id`, `kind`, `score`) VALUES (1, 'a', 1.5);";

    let mut group = c.benchmark_group("convert");

    group.bench_function("create_table", |b| {
        b.iter(|| convert_create_table(black_box(create)))
    });

    group.bench_function("insert", |b| b.iter(|| convert_statement(black_box(insert))));

    group.finish();
}

criterion_group!(
    benches,
    bench_split_throughput,
    bench_strip_comments,
    bench_plan,
    bench_convert,
);
criterion_main!(benches);
