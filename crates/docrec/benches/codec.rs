//! Codec and path benchmarks using divan

use docrec::codec::{decode, decode_document, encode, encode_document, infer_type};
use docrec::path::resolve;
use docrec::types::{Document, Value};

fn main() {
    divan::main();
}

const RECORD: &str = r#"Person@name:"Ann Lee",age:41,height:1.72d,born:1705276800000t,home:(Address@city:"Oslo",zip:"0150"),friends:[#9:1,#9:2,#9:3],tags:<"admin","ops">,extra:{"level":3s}"#;

fn sample() -> Document {
    decode_document(RECORD).unwrap()
}

// === Literal Benchmarks ===

mod literals {
    use super::*;

    #[divan::bench(args = ["42", "42l", "1.5d", "1705276800000t", "\"text\"", "12abc"])]
    fn infer(text: &str) -> docrec::TypeTag {
        infer_type(divan::black_box(text))
    }

    #[divan::bench]
    fn encode_long(bencher: divan::Bencher) {
        bencher.bench_local(|| encode(divan::black_box(&Value::Long(42)), None));
    }

    #[divan::bench]
    fn decode_list(bencher: divan::Bencher) {
        bencher.bench_local(|| decode(divan::black_box("[1,2l,3.5d,\"x\",#1:2]"), None));
    }
}

// === Record Benchmarks ===

mod records {
    use super::*;

    #[divan::bench]
    fn decode_record(bencher: divan::Bencher) {
        bencher.bench_local(|| decode_document(divan::black_box(RECORD)));
    }

    #[divan::bench]
    fn encode_record(bencher: divan::Bencher) {
        let doc = sample();
        bencher.bench_local(|| encode_document(divan::black_box(&doc)));
    }
}

// === Path Benchmarks ===

mod paths {
    use super::*;

    #[divan::bench(args = ["name", "home.city", "friends[1]", "friends[0-2]", "@size"])]
    fn resolve_path(bencher: divan::Bencher, path: &str) {
        let doc = sample();
        bencher.bench_local(|| resolve(divan::black_box(&doc), divan::black_box(path)));
    }
}
