use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rulescan_scanner::tokenize;

// A medium-size rule file with every literal kind
const RULE_SOURCE: &str = r#"
import "pe"
include "common.yar"

/*
    Detection rules for packed executables.
*/

private global rule IsPE : filetype
{
    meta:
        author = "analyst"
        description = "MZ header \"with\" a PE signature\x00"
    condition:
        uint16(0) == 0x5A4D and uint32(uint32(0x3C)) == 0x00004550
}

rule Packed_UPX : packer suspicious
{
    strings:
        $upx0 = "UPX0" ascii wide nocase
        $upx1 = { 55 50 58 31 ?? ?? [2-4] 00 00 }
        $stub = { 60 BE ?? ?? ?? ?? 8D BE ~00 ( 01 02 | 03 04 ) // entry
                  57 83 CD FF /* tail */ EB }
        $re1 = /UPX[0-9]\.[0-9]{2}/is
        $re2 = /section\\x2e(text|data)/
    condition:
        IsPE and filesize < 2MB and
        ( #upx0 > 2 or @upx1[1] < 0x400 ) and
        for any of ($upx*) : ( $ at pe.entry_point ) and
        !stub[1] >= 16 and
        math.entropy(0, filesize) >= 7.25 and
        uint16be(0o10) & 0xFF != 0
}

rule Large_Resource
{
    strings:
        $a = "resource" base64wide xor(0x01-0xff)
    condition:
        filesize > 512KB and all of them and not defined pe.version_info["Comments"]
}
"#;

fn bench_scan_rules(c: &mut Criterion) {
    let mut source = String::new();
    for _ in 0..32 {
        source.push_str(RULE_SOURCE);
    }

    c.bench_function("scan_rules_medium", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(RULE_SOURCE.as_bytes()));
            black_box(tokens)
        });
    });

    c.bench_function("scan_rules_large", |b| {
        b.iter(|| {
            let tokens = tokenize(black_box(source.as_bytes()));
            black_box(tokens)
        });
    });
}

criterion_group!(benches, bench_scan_rules);
criterion_main!(benches);
