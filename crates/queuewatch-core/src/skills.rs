/// Skill identifiers requested from the report, in the order the upstream
/// form expects them. `1450` is requested but not tracked by the registry.
pub const REPORT_SPLIT: &str = "1400,1401,1402,1403,1404,1405,1406,1407,1408,1409,1410,1411,1412,1413,1414,1415,1416,1450,1451,1452,1453,1454,1455,1456,1457,1458,1459,1460,1461,1462,1463,1464,1465";

/// Known skills: 4-digit identifier to human-readable label.
pub const SKILLS: &[(&str, &str)] = &[
    ("1400", "Levis EN (1400)"),
    ("1401", "Levis FR (1401)"),
    ("1402", "Levis Existing Order (1402)"),
    ("1403", "Dockers EN (1403)"),
    ("1404", "Dockers Existing Order EN (1404)"),
    ("1405", "Dockers Place Order EN (1405)"),
    ("1406", "Dockers Other Question EN (1406)"),
    ("1407", "Dockers SP (1407)"),
    ("1408", "Dockers Existing Order SP (1408)"),
    ("1409", "Dockers Place Order SP (1409)"),
    ("1410", "Dockers Other Question SP (1410)"),
    ("1411", "Dockers Retail Express EN (1411)"),
    ("1412", "Dockers Retail Express SP (1412)"),
    ("1413", "Dockers CB EN (1413)"),
    ("1414", "Dockers Existing Order CB EN (1414)"),
    ("1415", "Dockers Place Order CB EN (1415)"),
    ("1416", "Dockers Other CB EN (1416)"),
    ("1451", "Levis Escalation Sup (1451)"),
    ("1452", "Levis SP (1452)"),
    ("1453", "Levis Existing Order SP (1453)"),
    ("1454", "Levis Place Order EN (1454)"),
    ("1455", "Levis Other EN (1455)"),
    ("1456", "Levis Track Order SP (1456)"),
    ("1457", "Levis Place Order SP (1457)"),
    ("1458", "Levis Other SP (1458)"),
    ("1459", "Levis Retail Express EN (1459)"),
    ("1460", "Levis Retail Express SP (1460)"),
    ("1461", "Levis CB EN (1461)"),
    ("1462", "Levis Existing Order CB EN (1462)"),
    ("1463", "Levis Place Order CB EN (1463)"),
    ("1464", "Levis Retail Express CB EN (1464)"),
    ("1465", "Levis Other CB EN (1465)"),
];

/// Look up the label for a skill identifier.
pub fn skill_name(skill_id: &str) -> Option<&'static str> {
    SKILLS
        .iter()
        .find(|(id, _)| *id == skill_id)
        .map(|(_, name)| *name)
}

/// Whether the identifier belongs to the registry.
pub fn is_known_skill(skill_id: &str) -> bool {
    skill_name(skill_id).is_some()
}

/// Extract the identifier from a label such as `Levis EN (1400)`.
///
/// Takes the text after the last `(` up to the next `)`. Text without any
/// parenthesis is returned trimmed as-is.
pub fn parse_skill_id(label: &str) -> &str {
    let tail = label.rsplit('(').next().unwrap_or(label);
    tail.split(')').next().unwrap_or(tail).trim()
}
