//! Recursive-descent parser for FGD documents.

use serde_json::Value;

use super::ast::*;
use super::diagnostic::DiagnosticKind;
use super::scanner::Scanner;
use super::ParserConfig;

/// Outcome of parsing one clause inside an attribute block.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeClause {
    /// A complete attribute
    Attribute(Attribute),
    /// A `choices = [...]` block for the preceding attribute
    Choices(Vec<Choice>),
    /// Nothing usable on this line
    Skipped,
}

/// Parser for FGD documents.
///
/// A parser is consumed by [`Parser::parse`]; all cursor state lives and
/// dies with it.
pub struct Parser {
    scanner: Scanner,
}

impl Parser {
    /// Create a parser over `input`.
    pub fn new(input: &str, config: &ParserConfig) -> Self {
        Self {
            scanner: Scanner::new(input, config.scan_limit),
        }
    }

    /// Parse the whole document.
    pub fn parse(mut self) -> FgdDocument {
        let mut entities = Vec::new();

        while !self.scanner.is_at_end() {
            self.scanner.consume_whitespace();
            if self.scanner.is_at_end() {
                break;
            }

            if self.scanner.starts_with("//") {
                self.scanner.skip_line();
                continue;
            }

            if self.scanner.peek_is('@') {
                let entity = self.parse_entity_class();
                log::trace!(
                    "parsed {} '{}' with {} attributes",
                    entity.class_type,
                    entity.classname,
                    entity.attributes.len()
                );
                entities.push(entity);
            } else {
                self.scanner.advance();
            }
        }

        log::debug!("parsed {} entity classes", entities.len());
        FgdDocument {
            entities,
            diagnostics: self.scanner.into_diagnostics(),
        }
    }

    /// Parse one `@ClassType params = classname : "description" [ ... ]` unit.
    ///
    /// The cursor must be at `@`.
    pub fn parse_entity_class(&mut self) -> EntityClass {
        self.scanner.advance();
        let class_type = self.scanner.parse_identifier().to_lowercase();

        let mut color = None;
        let mut size = None;
        let mut base = None;
        let mut model = None;

        self.scanner.consume_whitespace();
        while !self.scanner.is_at_end() && !self.scanner.peek_is('=') {
            if self.scanner.keyword_at("color") {
                self.scanner.bump(5);
                color = self.scanner.parse_parentheses();
            } else if self.scanner.keyword_at("size") {
                self.scanner.bump(4);
                size = self.scanner.parse_parentheses();
            } else if self.scanner.keyword_at("base") {
                self.scanner.bump(4);
                base = self.scanner.parse_parentheses();
            } else if self.scanner.keyword_at("model") {
                self.scanner.bump(5);
                model = self.parse_model();
            } else {
                self.skip_unknown_parameter();
            }
        }

        self.scanner.advance();
        let classname = self.scanner.parse_identifier();

        self.scanner.consume_whitespace();
        let description = if self.scanner.peek_is(':') {
            self.scanner.advance();
            self.scanner.parse_string()
        } else {
            String::new()
        };

        self.scanner.consume_whitespace();
        let attributes = if self.scanner.peek_is('[') {
            self.scanner.advance();
            let attributes = self.parse_attribute_block(&classname);
            if self.scanner.peek_is(']') {
                self.scanner.advance();
            }
            attributes
        } else {
            Vec::new()
        };

        EntityClass {
            class_type,
            base,
            color,
            size,
            model,
            classname,
            description,
            attributes,
        }
    }

    /// Parse attributes up to (not including) the closing `]`.
    fn parse_attribute_block(&mut self, classname: &str) -> Vec<Attribute> {
        let mut attributes: Vec<Attribute> = Vec::new();

        loop {
            self.scanner.consume_whitespace();
            if self.scanner.is_at_end() || self.scanner.peek_is(']') {
                break;
            }
            if self.scanner.starts_with("//") {
                self.scanner.skip_line();
                continue;
            }

            let before = self.scanner.position();
            match self.parse_attribute() {
                AttributeClause::Attribute(attribute) => attributes.push(attribute),
                AttributeClause::Choices(choices) => match attributes.last_mut() {
                    Some(last) => last.choices = Some(choices),
                    None => {
                        log::debug!("dropping choices block in '{}'", classname);
                        self.scanner.report(DiagnosticKind::OrphanChoices, before);
                    }
                },
                AttributeClause::Skipped => {
                    if self.scanner.position() == before {
                        self.scanner.skip_entry();
                    }
                }
            }
        }

        attributes
    }

    /// Parse one attribute clause: `name(type) : "description" : default`.
    pub fn parse_attribute(&mut self) -> AttributeClause {
        self.scanner.consume_whitespace();
        let start = self.scanner.position();
        if self.scanner.is_at_end() {
            return AttributeClause::Skipped;
        }

        // Stray choice key outside a choices block.
        if self.scanner.peek_matches(|c| c.is_ascii_digit()) {
            self.scanner.skip_entry();
            return AttributeClause::Skipped;
        }

        let name = self.scanner.parse_identifier();
        if name.is_empty() {
            return AttributeClause::Skipped;
        }

        self.scanner.consume_whitespace();
        if name == "choices" && self.scanner.peek_is('=') {
            return AttributeClause::Choices(self.parse_choices());
        }

        let Some(attr_type) = self.scanner.parse_parentheses() else {
            self.scanner.report(DiagnosticKind::MalformedAttribute, start);
            self.scanner.skip_entry();
            return AttributeClause::Skipped;
        };

        let mut attribute = Attribute::new(name, attr_type, String::new());

        self.scanner.consume_whitespace();
        if self.scanner.peek_is(':') {
            self.scanner.advance();
            attribute.description = self.scanner.parse_string();

            self.scanner.consume_whitespace();
            if self.scanner.peek_is(':') {
                self.scanner.advance();
                self.scanner.consume_whitespace();
                attribute.default = self.parse_default();
                self.skip_trailing_segments();
            }
        }

        self.scanner.consume_whitespace();
        if self.scanner.peek_is('=') {
            attribute.choices = Some(self.parse_choices());
        }

        AttributeClause::Attribute(attribute)
    }

    /// Parse a `= [ key : "description" ... ]` block.
    ///
    /// The cursor must be at `=`. Malformed entries discard the rest of their
    /// line; trailing `: value` segments of a flag entry are ignored.
    pub fn parse_choices(&mut self) -> Vec<Choice> {
        let mut choices = Vec::new();

        self.scanner.advance();
        self.scanner.consume_whitespace();
        if !self.scanner.peek_is('[') {
            return choices;
        }
        self.scanner.advance();

        while !self.scanner.is_at_end() {
            self.scanner.consume_whitespace();
            if self.scanner.is_at_end() {
                break;
            }
            if self.scanner.peek_is(']') {
                self.scanner.advance();
                break;
            }
            if self.scanner.starts_with("//") {
                self.scanner.skip_line();
                continue;
            }

            let value = if self.scanner.peek_is('"') {
                self.scanner.parse_string()
            } else {
                self.scanner.parse_signed_integer()
            };
            if value.is_empty() {
                self.scanner.skip_entry();
                continue;
            }

            self.scanner.consume_whitespace();
            if !self.scanner.peek_is(':') {
                self.scanner.skip_entry();
                continue;
            }
            self.scanner.advance();
            self.scanner.consume_whitespace();

            if self.scanner.peek_is('"') {
                let description = self.scanner.parse_string();
                choices.push(Choice {
                    value: value.trim().to_string(),
                    description,
                });
                self.skip_trailing_segments();
            } else {
                self.scanner.skip_entry();
            }
        }

        choices
    }

    fn parse_default(&mut self) -> Option<String> {
        if self.scanner.peek_is('"') {
            Some(self.scanner.parse_string())
        } else if self.scanner.peek_matches(|c| c.is_ascii_digit() || c == '-') {
            Some(self.scanner.parse_number())
        } else {
            None
        }
    }

    // Long descriptions after a default and flag states after a choice
    // (`: "..."`, `: 0`) are not kept.
    fn skip_trailing_segments(&mut self) {
        loop {
            self.scanner.consume_whitespace();
            if !self.scanner.peek_is(':') {
                break;
            }
            self.scanner.advance();
            self.scanner.consume_whitespace();
            if self.parse_default().is_none() {
                break;
            }
        }
    }

    fn parse_model(&mut self) -> Option<Model> {
        let start = self.scanner.position();
        let raw = self.scanner.parse_model_parameter()?;

        match serde_json::from_str::<Value>(&raw.replace('\'', "\"")) {
            Ok(Value::Object(map)) => Some(Model::from(map)),
            Ok(Value::String(path)) => Some(Model::Path(path)),
            _ => {
                self.scanner.report(DiagnosticKind::ModelNotStructured, start);
                Some(Model::Path(raw))
            }
        }
    }

    // Unknown header parameters run up to whitespace or `=`; a parenthesized
    // group inside one is skipped as a unit.
    fn skip_unknown_parameter(&mut self) {
        while let Some(ch) = self.scanner.peek() {
            if ch.is_whitespace() || ch == '=' {
                break;
            }
            if ch == '(' {
                if self.scanner.parse_parentheses().is_none() {
                    break;
                }
            } else {
                self.scanner.advance();
            }
        }
        self.scanner.consume_whitespace();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fgd::{parse, parse_with_config, ScanLimit};

    fn parse_one(input: &str) -> EntityClass {
        let doc = parse(input);
        assert_eq!(doc.entities.len(), 1, "expected one entity in {:?}", input);
        doc.entities.into_iter().next().unwrap()
    }

    #[test]
    fn test_parse_point_class() {
        let entity = parse_one(
            r#"@PointClass color(255 0 0) = foo : "desc" [ attr(integer) : "a" : "3" ]"#,
        );
        assert_eq!(entity.class_type, "pointclass");
        assert_eq!(entity.color.as_deref(), Some("255 0 0"));
        assert_eq!(entity.classname, "foo");
        assert_eq!(entity.description, "desc");
        assert_eq!(
            entity.attributes,
            vec![Attribute {
                name: "attr".to_string(),
                attr_type: "integer".to_string(),
                description: "a".to_string(),
                default: Some("3".to_string()),
                choices: None,
            }]
        );
    }

    #[test]
    fn test_parse_header_parameters() {
        let entity = parse_one(
            "@SolidClass base(Targetname, Appearflags) size(-16 -16 -24, 16 16 32) \
             color(0 255 0) = func_door : \"Door\" []",
        );
        assert_eq!(entity.class_type, "solidclass");
        assert_eq!(entity.base.as_deref(), Some("Targetname, Appearflags"));
        assert_eq!(entity.size.as_deref(), Some("-16 -16 -24, 16 16 32"));
        assert_eq!(entity.color.as_deref(), Some("0 255 0"));
        assert_eq!(entity.classname, "func_door");
        assert!(entity.attributes.is_empty());
    }

    #[test]
    fn test_trailing_choices_attach_to_preceding_attribute() {
        let input = r#"
@PointClass = monster_x : "Monster"
[
    health(integer) : "Health" : 100
    skill(integer) : "Skill" : 1
    choices =
    [
        0 : "Easy"
        1 : "Medium"
        // hard is rarely used
        2 : "Hard"
    ]
]
"#;
        let entity = parse_one(input);
        assert_eq!(entity.attributes.len(), 2);
        assert_eq!(entity.attributes[0].name, "health");
        assert_eq!(entity.attributes[0].default.as_deref(), Some("100"));
        assert_eq!(entity.attributes[0].choices, None);

        let choices = entity.attributes[1].choices.as_ref().unwrap();
        let values: Vec<_> = choices.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["0", "1", "2"]);
        assert_eq!(choices[2].description, "Hard");
    }

    #[test]
    fn test_choices_do_not_cross_entity_blocks() {
        let input = r#"
@PointClass = a [ speed(integer) : "Speed" ]
@PointClass = b [
    choices = [ 0 : "Off" ]
    delay(float) : "Delay" : "0.5"
]
"#;
        let doc = parse(input);
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[0].attributes[0].choices, None);
        assert_eq!(doc.entities[1].attributes.len(), 1);
        assert_eq!(doc.entities[1].attributes[0].choices, None);
        assert!(doc
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::OrphanChoices));
    }

    #[test]
    fn test_inline_choices_and_flags() {
        let input = r#"
@PointClass = trigger_x : "Trigger"
[
    style(choices) : "Style" : 0 : "Long form help text" =
    [
        0 : "Normal"
        -1 : "Inverted"
    ]
    spawnflags(flags) =
    [
        1 : "Start off" : 0
        2 : "Silent" : 1
    ]
    target(target_destination) : "Target"
]
"#;
        let entity = parse_one(input);
        let names: Vec<_> = entity.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["style", "spawnflags", "target"]);

        let style = &entity.attributes[0];
        assert_eq!(style.default.as_deref(), Some("0"));
        let style_values: Vec<_> = style
            .choices
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(style_values, vec!["0", "-1"]);

        let flags = entity.attributes[1].choices.as_ref().unwrap();
        assert_eq!(flags.len(), 2);
        assert_eq!(flags[1].value, "2");
        assert_eq!(flags[1].description, "Silent");
    }

    #[test]
    fn test_one_line_flags_block_keeps_following_attributes() {
        let input = "@PointClass = x [\n spawnflags(flags) = [ 1 : \"Start off\" : 0 ]\n target(string) : \"Target\"\n delay(float) : \"Delay\"\n]\n@PointClass = y []";
        let doc = parse(input);
        assert_eq!(doc.entities.len(), 2);

        let names: Vec<_> = doc.entities[0].attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["spawnflags", "target", "delay"]);
        let flags = doc.entities[0].attributes[0].choices.as_ref().unwrap();
        assert_eq!(flags, &vec![Choice { value: "1".to_string(), description: "Start off".to_string() }]);
        assert_eq!(doc.entities[1].classname, "y");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_one_line_entity_with_choices_and_flags() {
        let input = r#"@PointClass = x [ spawnflags(flags) = [ 1 : "A" : 0 2 : "B" : 1 ] mode(integer) : "Mode" choices = [ 0 : "Off" 1 : "On" ] target(string) : "T" ] @PointClass = y []"#;
        let doc = parse(input);
        let classnames: Vec<_> = doc.entities.iter().map(|e| e.classname.as_str()).collect();
        assert_eq!(classnames, vec!["x", "y"]);

        let entity = &doc.entities[0];
        let names: Vec<_> = entity.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["spawnflags", "mode", "target"]);

        let flag_values: Vec<_> = entity.attributes[0].choices.as_ref().unwrap().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(flag_values, vec!["1", "2"]);
        let mode_values: Vec<_> = entity.attributes[1].choices.as_ref().unwrap().iter().map(|c| c.description.as_str()).collect();
        assert_eq!(mode_values, vec!["Off", "On"]);
        assert_eq!(entity.attributes[2].choices, None);
    }

    #[test]
    fn test_malformed_entry_keeps_block_terminator() {
        let doc = parse(r#"@PointClass = x [ a(integer) : "A" choices = [ 0 : oops ] b(string) ] @PointClass = y [ broken ]"#);
        let classnames: Vec<_> = doc.entities.iter().map(|e| e.classname.as_str()).collect();
        assert_eq!(classnames, vec!["x", "y"]);
        assert_eq!(doc.entities[0].attributes[0].choices, Some(Vec::new()));
        assert_eq!(doc.entities[0].attributes[1].name, "b");
        assert!(doc.entities[1].attributes.is_empty());
        assert_eq!(doc.diagnostics.len(), 1);
        assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::MalformedAttribute);
    }

    #[test]
    fn test_quoted_choice_keys() {
        let entity = parse_one(
            "@PointClass = env_x [\n mode(choices) : \"Mode\" : \"fast\" = [\n \"fast\" : \"Fast\"\n \"slow\" : \"Slow\"\n ]\n]",
        );
        let choices = entity.attributes[0].choices.as_ref().unwrap();
        assert_eq!(choices[1].value, "slow");
    }

    #[test]
    fn test_malformed_choice_lines_are_skipped() {
        let entity = parse_one(
            "@PointClass = x [\n a(integer) : \"A\"\n choices = [\n 0 \"missing colon\"\n 1 : no quote\n 2 : \"Two\"\n ]\n]",
        );
        let choices = entity.attributes[0].choices.as_ref().unwrap();
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].value, "2");
    }

    #[test]
    fn test_model_structured_and_fallback() {
        let entity = parse_one(
            "@PointClass model({'path': 'models/items/a.mdl', 'skin': 1}) = item_a []",
        );
        match entity.model {
            Some(Model::Structured(map)) => {
                assert_eq!(map["path"], "models/items/a.mdl");
                assert_eq!(map["skin"], 1);
            }
            other => panic!("expected structured model, got {:?}", other),
        }

        let doc = parse("@PointClass model(not valid json even with quote swap) = item_b []");
        let model = doc.entities[0].model.as_ref().unwrap();
        assert_eq!(
            model.to_value(),
            serde_json::json!({"path": "not valid json even with quote swap"})
        );
        assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::ModelNotStructured);
    }

    #[test]
    fn test_entities_survive_json_roundtrip() {
        let input = r#"
@PointClass model({'path': 'a.mdl'}) = a [ health(integer) : "Health" : 10 ]
@PointClass model({'path': 'b.mdl', 'skin': 2}) = b [ style(choices) : "Style" : 0 = [ 0 : "Plain" ] ]
@PointClass model(c.mdl) = c []
"#;
        let doc = parse(input);
        assert_eq!(doc.entities[0].model, Some(Model::Path("a.mdl".to_string())));

        let json = serde_json::to_string(&doc.entities).unwrap();
        let back: Vec<EntityClass> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc.entities);
    }

    #[test]
    fn test_model_quoted_path() {
        let entity = parse_one("@PointClass model(\"models/box.mdl\") = box []");
        assert_eq!(entity.model, Some(Model::Path("models/box.mdl".to_string())));
    }

    #[test]
    fn test_unknown_parameters_are_ignored() {
        let entity = parse_one(
            "@PointClass iconsprite(\"sprites/a b.spr\") flags(Angle, Light) halfgridsnap \
             size(-8 -8 -8, 8 8 8) = info_x : \"X\" []",
        );
        assert_eq!(entity.size.as_deref(), Some("-8 -8 -8, 8 8 8"));
        assert_eq!(entity.classname, "info_x");
        assert_eq!(entity.description, "X");
    }

    #[test]
    fn test_comments_and_blank_lines_do_not_change_attributes() {
        let plain = "@PointClass = x [\n a(integer) : \"A\" : 1\n b(string) : \"B\" : \"v\"\n]";
        let noisy = "// header\n\n@PointClass = x [\n\n // first\n a(integer) : \"A\" : 1\n\n\n // second\n // more\n b(string) : \"B\" : \"v\"\n\n]\n// trailer";
        assert_eq!(parse(plain).entities, parse(noisy).entities);
    }

    #[test]
    fn test_stray_numeric_line_skips_only_itself() {
        let entity = parse_one("@PointClass = x [\n a(integer) : \"A\"\n 3 : \"stray\"\n b(integer) : \"B\"\n]");
        let names: Vec<_> = entity.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_attribute_without_type_is_reported() {
        let doc = parse("@PointClass = x [\n broken : \"no type\"\n ok(string)\n]");
        let entity = &doc.entities[0];
        assert_eq!(entity.attributes.len(), 1);
        assert_eq!(entity.attributes[0].name, "ok");
        assert_eq!(entity.attributes[0].description, "");
        assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::MalformedAttribute);
        assert_eq!(doc.diagnostics[0].line, 2);
    }

    #[test]
    fn test_malformed_attribute_discards_its_line() {
        let doc = parse("@PointClass = x [\n bad type(integer) : \"x\"\n ok(string) : \"Ok\"\n]");
        let names: Vec<_> = doc.entities[0].attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["ok"]);
        assert_eq!(doc.diagnostics.len(), 1);
        assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::MalformedAttribute);
    }

    #[test]
    fn test_negative_and_decimal_defaults() {
        let entity = parse_one(
            "@PointClass = x [ angle(float) : \"Angle\" : -90.5 wait(integer) : \"Wait\" : 4 ]",
        );
        assert_eq!(entity.attributes[0].default.as_deref(), Some("-90.5"));
        assert_eq!(entity.attributes[1].default.as_deref(), Some("4"));
    }

    #[test]
    fn test_unterminated_string_terminates() {
        let doc = parse("@PointClass = x : \"never closed [ a(integer) ]");
        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.entities[0].description, "");
        assert!(doc
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnterminatedString));
    }

    #[test]
    fn test_unbalanced_size_terminates() {
        let doc = parse("@PointClass size(-16 -16 0, 16 16 32 = x [ a(integer) ]");
        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.entities[0].size, None);
        assert!(doc
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::UnbalancedParentheses));
    }

    #[test]
    fn test_fixed_scan_limit_truncates_long_strings() {
        let input = format!("@PointClass = x : \"{}\" []", "d".repeat(1500));
        let config = crate::fgd::ParserConfig::new().with_scan_limit(ScanLimit::Fixed(1000));
        let doc = parse_with_config(&input, &config);
        assert_eq!(doc.entities[0].description, "");
        assert_eq!(doc.diagnostics[0].kind, DiagnosticKind::ScanLimitExceeded);

        let doc = parse(&input);
        assert_eq!(doc.entities[0].description.len(), 1500);
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_truncated_input_terminates() {
        for input in ["@", "@PointClass", "@PointClass =", "@PointClass = x :", "@PointClass = x [", "@PointClass = x [ a(integer) :", "@PointClass = x [ choices ="] {
            let doc = parse(input);
            assert_eq!(doc.entities.len(), 1, "input {:?}", input);
        }
    }

    #[test]
    fn test_stray_top_level_text() {
        let doc = parse("junk ; ] \n@BaseClass = Targetname [ targetname(target_source) : \"Name\" ]\n}}\n@PointClass base(Targetname) = y []");
        let classnames: Vec<_> = doc.entities.iter().map(|e| e.classname.as_str()).collect();
        assert_eq!(classnames, vec!["Targetname", "y"]);
        assert_eq!(doc.entities[0].class_type, "baseclass");
    }

    #[test]
    fn test_duplicate_classnames_are_kept() {
        let doc = parse("@PointClass = x [] @PointClass = x : \"second\" []");
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[1].description, "second");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let input = "@PointClass model(a.mdl) = x [ a(integer) : \"A\" choices = [ 0 : \"z\" ] ]";
        assert_eq!(parse(input).entities, parse(input).entities);
    }

    #[test]
    fn test_empty_input() {
        let doc = parse("");
        assert!(doc.is_empty());
        assert!(doc.diagnostics.is_empty());
    }
}
