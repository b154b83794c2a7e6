//! Text dump of a decoded map
//!
//! Rendering is a pure function of the [`CrushMap`]: every block is
//! built as a list of lines so it can be compared by value.

use std::fmt;

use crate::crush::{pg_type_name, Bucket, CrushMap, NameTable, Rule, RuleOp, RuleStep};

/// Rendered dump, one line list per block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dump {
    pub tunables: Vec<String>,
    pub devices: Vec<String>,
    pub types: Vec<String>,
    pub buckets: Vec<String>,
    pub rules: Vec<String>,
}

impl Dump {
    /// Full listing with section comments.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec!["# begin crush map".to_string()];
        out.extend(self.tunables.iter().cloned());
        for (title, block) in [
            ("# devices", &self.devices),
            ("# types", &self.types),
            ("# buckets", &self.buckets),
            ("# rules", &self.rules),
        ] {
            out.push(String::new());
            out.push(title.to_string());
            out.extend(block.iter().cloned());
        }
        out.push(String::new());
        out.push("# end crush map".to_string());
        out
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub fn render(map: &CrushMap) -> Dump {
    Dump {
        tunables: render_tunables(map),
        devices: render_devices(map),
        types: render_types(&map.type_names),
        buckets: render_buckets(map),
        rules: render_rules(map),
    }
}

fn render_tunables(map: &CrushMap) -> Vec<String> {
    let t = &map.tunables;
    vec![
        format!("tunable choose_local_tries {}", t.choose_local_tries),
        format!("tunable choose_local_fallback_tries {}", t.choose_local_fallback_tries),
        format!("tunable choose_total_tries {}", t.choose_total_tries),
        format!("tunable chooseleaf_descend_once {}", t.chooseleaf_descend_once),
    ]
}

fn render_devices(map: &CrushMap) -> Vec<String> {
    (0..map.max_devices)
        .map(|i| {
            // ids past i32::MAX cannot name a device
            let id = i32::try_from(i).unwrap_or(i32::MAX);
            format!("device {i} {}", map.device_names.item_name(id))
        })
        .collect()
}

fn render_types(types: &NameTable) -> Vec<String> {
    let mut lines = Vec::with_capacity(types.len() + 1);
    if !types.contains(0) {
        lines.push("type 0 device".to_string());
    }
    lines.extend(types.iter().map(|(key, name)| format!("type {key} {name}")));
    lines
}

fn render_buckets(map: &CrushMap) -> Vec<String> {
    let mut lines = Vec::new();
    for bucket in map.buckets.iter().flatten() {
        render_bucket(bucket, map, &mut lines);
    }
    lines
}

fn render_bucket(bucket: &Bucket, map: &CrushMap, lines: &mut Vec<String>) {
    let type_name = map.type_names.get(i32::from(bucket.bucket_type)).unwrap_or("");
    lines.push(format!("{type_name} {} {{", map.device_names.item_name(bucket.id)));
    lines.push(format!("\tid {}", bucket.id));
    lines.push(format!("\t# weight {:.3}", f64::from(bucket.weight.signed_whole())));
    lines.push(format!("\talg {}", bucket.alg().name()));
    lines.push(format!("\thash {} # rjenkins1", bucket.hash));
    for (index, &item) in bucket.items.iter().enumerate() {
        lines.push(format!(
            "\titem {} weight {:.3}",
            map.device_names.item_name(item),
            f64::from(bucket.item_weight(index).whole()),
        ));
    }
    lines.push("}".to_string());
}

fn render_rules(map: &CrushMap) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, rule) in map.rules.iter().enumerate() {
        if let Some(rule) = rule {
            render_rule(index, rule, map, &mut lines);
        }
    }
    lines
}

fn render_rule(index: usize, rule: &Rule, map: &CrushMap, lines: &mut Vec<String>) {
    let name = i32::try_from(index)
        .ok()
        .and_then(|key| map.rule_names.get(key))
        .map(str::to_string)
        .unwrap_or_else(|| format!("rule{index}"));
    let mask = rule.mask();
    let pg_type = pg_type_name(mask.pg_type)
        .map(str::to_string)
        .unwrap_or_else(|| mask.pg_type.to_string());

    lines.push(format!("rule {name} {{"));
    lines.push(format!("\truleset {}", mask.ruleset));
    lines.push(format!("\ttype {pg_type}"));
    lines.push(format!("\tmin_size {}", mask.min_size));
    lines.push(format!("\tmax_size {}", mask.max_size));
    for step in &rule.steps {
        lines.push(format!("\t{}", render_step(step, map)));
    }
    lines.push("}".to_string());
}

fn render_step(step: &RuleStep, map: &CrushMap) -> String {
    match (step.op, step.op.keyword()) {
        (RuleOp::Noop | RuleOp::Emit, Some(keyword)) => format!("step {keyword}"),
        (RuleOp::Take, Some(keyword)) => {
            format!("step {keyword} {}", map.device_names.item_name(step.arg1))
        }
        (_, Some(keyword)) => {
            let type_name = map.type_names.get(step.arg2).unwrap_or("");
            format!("step {keyword} {} type {type_name}", step.arg1)
        }
        (op, None) => format!("step unknown {} {} {}", op.code(), step.arg1, step.arg2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BinaryWriter;
    use crate::crush::map::tests::{empty_tables, header, sample_map, tail};

    fn decode(data: &[u8]) -> CrushMap {
        CrushMap::decode(data).unwrap()
    }

    #[test]
    fn test_minimal_map() {
        let mut w = BinaryWriter::new();
        header(&mut w, 0, 0, 2);
        empty_tables(&mut w);
        tail(&mut w, [0; 4]);

        let dump = render(&decode(&w.into_vec()));
        assert_eq!(dump.devices, vec!["device 0 device0", "device 1 device1"]);
        assert_eq!(dump.types, vec!["type 0 device"]);
        assert!(dump.buckets.is_empty());
        assert!(dump.rules.is_empty());
    }

    #[test]
    fn test_sample_devices_and_types() {
        let dump = render(&decode(&sample_map()));
        assert_eq!(
            dump.devices,
            vec![
                "device 0 osd.0",
                "device 1 osd.1",
                "device 2 device2",
                "device 3 osd.3",
            ]
        );
        assert_eq!(dump.types, vec!["type 0 osd", "type 1 host", "type 2 root"]);
        assert_eq!(dump.tunables[2], "tunable choose_total_tries 19");
    }

    #[test]
    fn test_sample_buckets() {
        let dump = render(&decode(&sample_map()));
        let expected = vec![
            "root default {",
            "\tid -1",
            "\t# weight 4.000",
            "\talg straw",
            "\thash 0 # rjenkins1",
            "\titem host-a weight 2.000",
            "\titem host-b weight 2.000",
            "}",
            "host host-a {",
            "\tid -3",
            "\t# weight 2.000",
            "\talg uniform",
            "\thash 0 # rjenkins1",
            "\titem osd.0 weight 1.000",
            "\titem osd.1 weight 1.000",
            "}",
            "host host-b {",
            "\tid -4",
            "\t# weight 2.000",
            "\talg list",
            "\thash 0 # rjenkins1",
            "\titem device2 weight 1.000",
            "\titem osd.3 weight 1.000",
            "}",
        ];
        assert_eq!(dump.buckets, expected);
    }

    #[test]
    fn test_sample_rules() {
        let dump = render(&decode(&sample_map()));
        let expected = vec![
            "rule data {",
            "\truleset 1",
            "\ttype replicated",
            "\tmin_size 1",
            "\tmax_size 10",
            "\tstep take default",
            "\tstep chooseleaf firstn 0 type host",
            "\tstep emit",
            "}",
        ];
        assert_eq!(dump.rules, expected);
    }

    #[test]
    fn test_unnamed_rule_and_unknown_step() {
        let mut w = BinaryWriter::new();
        header(&mut w, 0, 1, 0);
        w.write_u32(1).write_u32(3).write_u32(0x0201_0700);
        w.write_u32(2).write_i32(3).write_i32(9);
        w.write_u32(5).write_i32(1).write_i32(-2);
        w.write_u32(0).write_i32(0).write_i32(0);
        empty_tables(&mut w);
        tail(&mut w, [0; 4]);

        let dump = render(&decode(&w.into_vec()));
        assert_eq!(
            dump.rules,
            vec![
                "rule rule0 {",
                "\truleset 0",
                "\ttype 7",
                "\tmin_size 1",
                "\tmax_size 2",
                "\tstep choose firstn 3 type ",
                "\tstep unknown 5 1 -2",
                "\tstep noop",
                "}",
            ]
        );
    }

    #[test]
    fn test_pg_type_zero_renders_null() {
        let mut w = BinaryWriter::new();
        header(&mut w, 0, 1, 0);
        w.write_u32(1).write_u32(0).write_u32(0x0201_0000);
        empty_tables(&mut w);
        tail(&mut w, [0; 4]);

        let dump = render(&decode(&w.into_vec()));
        assert_eq!(dump.rules[2], "\ttype null");
    }

    #[test]
    fn test_tree_bucket_and_missing_type() {
        let mut w = BinaryWriter::new();
        header(&mut w, 2, 0, 0);
        w.write_u32(0);
        w.write_u32(3).write_i32(-2).write_u16(7).write_u8(3).write_u8(0);
        w.write_i32(-0x1_0000).write_u32(1);
        w.write_i32(4);
        w.write_u8(2).write_u32(0).write_u32(5 << 16);
        empty_tables(&mut w);
        tail(&mut w, [0; 4]);

        let dump = render(&decode(&w.into_vec()));
        assert_eq!(
            dump.buckets,
            vec![
                " bucket1 {",
                "\tid -2",
                "\t# weight -1.000",
                "\talg tree",
                "\thash 0 # rjenkins1",
                "\titem device4 weight 5.000",
                "}",
            ]
        );
    }

    #[test]
    fn test_explicit_type_zero_not_duplicated() {
        let mut table = NameTable::new();
        table.insert(0, "osd");
        assert_eq!(render_types(&table), vec!["type 0 osd"]);
    }

    #[test]
    fn test_full_listing_layout() {
        let mut w = BinaryWriter::new();
        header(&mut w, 0, 0, 1);
        empty_tables(&mut w);
        tail(&mut w, [2, 5, 19, 1]);

        let text = render(&decode(&w.into_vec())).to_string();
        let expected = "\
# begin crush map
tunable choose_local_tries 2
tunable choose_local_fallback_tries 5
tunable choose_total_tries 19
tunable chooseleaf_descend_once 1

# devices
device 0 device0

# types
type 0 device

# buckets

# rules

# end crush map
";
        assert_eq!(text, expected);
    }
}
