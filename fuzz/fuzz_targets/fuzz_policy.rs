#![no_main]

use libfuzzer_sys::fuzz_target;

use forest_rotation_simulator::{Policy, Species};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(policy) = s.parse::<Policy>() {
            // A parsed policy always prints back to something that parses to itself.
            let reparsed: Policy = policy.to_string().parse().unwrap();
            assert_eq!(reparsed, policy);
            for species in Species::ALL {
                let _ = policy.validate(species, 100);
            }
        }
    }
});
