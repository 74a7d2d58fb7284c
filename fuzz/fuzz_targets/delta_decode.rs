#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    twindiff_fuzz::fuzz_delta_decode(data);
});
