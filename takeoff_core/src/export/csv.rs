use crate::fmt::format_decimal;
use crate::members::MemberRecord;

const HEADER: &str = "id,role,standard,shape,size,name,ax,ay,az,bx,by,bz,length_m";

/// One CSV row per member; endpoints in mm, length in m.
pub fn members_to_csv(members: &[MemberRecord]) -> String {
    let mut out = String::with_capacity(64 * (members.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for m in members {
        let (standard, shape, size) = match &m.profile.selection {
            Some(sel) => (sel.standard.as_str(), sel.shape.as_str(), sel.size.as_str()),
            None => ("", "", ""),
        };
        let fields = [
            escape_csv(&m.id.to_string()),
            m.role.key().to_string(),
            escape_csv(standard),
            escape_csv(shape),
            escape_csv(size),
            escape_csv(&m.profile.name),
            format_decimal(m.a.x, 3),
            format_decimal(m.a.y, 3),
            format_decimal(m.a.z, 3),
            format_decimal(m.b.x, 3),
            format_decimal(m.b.y, 3),
            format_decimal(m.b.z, 3),
            format_decimal(m.length_m(), 3),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
