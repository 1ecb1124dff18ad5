use crate::commands::Out;
use crate::model::Category;
use crate::Result;

/// Lists the categories an expense can be registered under, one per line on stdout.
pub fn categories() -> Result<Out<Vec<String>>> {
    let labels: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
    let display: String = labels.iter().map(|l| format!("{l}\n")).collect();
    Ok(Out::new(format!("{} categories", labels.len()), labels).with_display(display))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let out = categories().unwrap();
        let labels = out.structure().unwrap();
        assert_eq!(labels.len(), 11);
        assert_eq!(labels[6], "Shopping/Apparel");
        assert!(out.display().unwrap().starts_with("Food\nTransport\n"));
    }
}
