#[cfg(test)]
mod test {
    use super::super::PkgVersion;
    use std::cmp::Ordering::*;

    #[test]
    fn pkg_ver_ord() {
        let source = vec![
            ("1.1.1", Less, "1.1.2"),
            ("1b", Greater, "1a"),
            ("1~~", Less, "1~~a"),
            ("1~~a", Less, "1~"),
            ("1~", Less, "1"),
            ("1", Less, "1.1"),
            ("1.0", Less, "1.1"),
            ("1.2", Less, "1.11"),
            ("1.0.9", Less, "1.0.10"),
            ("1.0-1", Less, "1.1"),
            ("1.0-1", Less, "1.0-12"),
            // equal versions may still render differently
            ("1:1.0-0", Equal, "1:1.0"),
            ("1.0", Equal, "1.0"),
            ("1.00", Equal, "1.0"),
            ("0:1.0", Equal, "1.0"),
            ("1.0-1", Equal, "1.0-1"),
            ("1:1.0-1", Equal, "1:1.0-1"),
            ("1:1.0", Equal, "1:1.0"),
            ("1.0-1", Less, "1.0-2"),
            ("1.0final-5sarge1", Greater, "1.0final-5"),
            ("1.0final-5", Greater, "1.0a7-2"),
            ("0.9.2-5", Less, "0.9.2+cvs.1.0.dev.2004.07.28-1"),
            ("1:500", Less, "1:5000"),
            ("100:500", Greater, "11:5000"),
            ("1.0.4-2", Greater, "1.0pre7-2"),
            ("1.5~rc1", Less, "1.5"),
            ("1.5~rc1", Less, "1.5+1"),
            ("1.5~rc1", Less, "1.5~rc2"),
            ("1.5~rc1", Greater, "1.5~dev0"),
            ("1.0~rc1", Less, "1.0"),
            ("1.0~~", Less, "1.0~"),
            ("2:1.0.0", Greater, "1:99.0.0"),
            ("9.8-7ubuntu6", Greater, "9.8-7ubuntu5"),
            ("9.8-7ubuntu6", Greater, "9.8"),
        ];

        for e in source {
            println!("Comparing {} vs {}", e.0, e.2);
            assert_eq!(
                PkgVersion::try_from(e.0)
                    .unwrap()
                    .cmp(&PkgVersion::try_from(e.2).unwrap()),
                e.1
            );
            // the relation flips with the operands
            assert_eq!(
                PkgVersion::try_from(e.2)
                    .unwrap()
                    .cmp(&PkgVersion::try_from(e.0).unwrap()),
                e.1.reverse()
            );
        }
    }

    #[test]
    fn pkg_ver_eq() {
        let source = vec![("1.1+git2021", "1.1+git2021"), ("1.0-0", "1.0")];
        for e in &source {
            assert_eq!(
                PkgVersion::try_from(e.0).unwrap(),
                PkgVersion::try_from(e.1).unwrap()
            );
        }
    }

    #[test]
    fn pkg_ver_ord_is_total() {
        let source = vec![
            "0.9", "1.0~~", "1.0~", "1.0~rc1", "1.0", "1.0-1", "1.0-2", "1.0+b1", "1.1", "1:0.5",
            "2:0.1",
        ];
        let vers: Vec<PkgVersion> = source
            .iter()
            .map(|s| PkgVersion::try_from(*s).unwrap())
            .collect();

        for a in &vers {
            for b in &vers {
                // exactly one relation holds per pair
                let relations = [a < b, a == b, a > b];
                assert_eq!(relations.iter().filter(|r| **r).count(), 1);
                for c in &vers {
                    if a <= b && b <= c {
                        assert!(a <= c, "transitivity broken for {} {} {}", a, b, c);
                    }
                }
            }
        }

        // the list above is written in ascending order
        let mut sorted = vers.clone();
        sorted.sort();
        let rendered: Vec<String> = sorted.iter().map(|v| v.to_string()).collect();
        let expected: Vec<String> = vers.iter().map(|v| v.to_string()).collect();
        assert_eq!(rendered, expected);
    }
}
