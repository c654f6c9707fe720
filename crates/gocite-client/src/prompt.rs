//! Default GO-term annotation prompt.

use gocite_common::PaperMetadata;

const PROMPT_TEMPLATE: &str = r#"You are familiar with all of the Gene Ontology term titles and their descriptions, found on the GO database.

You will be given isolated excerpts from a scientific Publication which is titled '{title}' with pubmedId '{paperID}'. These excerpts specifically mention the isoform '{name}' and its functional roles. From these excerpts, identify all the Gene Ontology terms that correspond best to the given text. i.e. Use information you have on Gene Ontology terms, their titles and description, to tell me what are the Gene Ontology terms that can be mapped to the '{name}' from this text.

Also include the reason behind the association between GO term and '{name}' from the text provided, record the portions of text that were used to make the associations.

Do Not make term associations without EXPLICIT evidence provided in the excerpts, and repeat 3 rounds of analysis before providing me a final answer, but do not reply your process, only reply the final answer. Report only associations reported in human cells/samples.

Make use of classification hierarchies when you do this. e.g. if the paper indicated that '{name}' is involved in "cardiac muscle cell proliferation", then the term most corresponding to '{name}' would be "cardiac muscle cell proliferation", whose description is "The expansion of a cardiac muscle cell population by cell division."

If text include any iso-form name looks like {name} but have small difference, then it is another isoform, do not mismatch. You are looking for exactly **{name}**, no other isoform.

[Only include terms that are statistically over-represented and being able to clearly find the citation from the text.]

Please follow this format strictly when generating a response, any other text except the list will not be accepted:

Goterm 1: <Goterm 1>
Name: <Goterm 1 name>
Text Citation: <text citation for GOterm 1>
Reason: <reasoning 1> ;

Goterm 2: <Goterm 2>
Name: <Goterm 2 name>
Text Citation: <text citation for GOterm 2>
Reason: <reasoning 2> ;

Goterm 3: <Goterm 3>
Name: <Goterm 3 name>
Text Citation: <text citation for GOterm 3>
Reason: <reasoning 3> ;

Repeat until you have generated the list for all associated GO terms. Remember to switch to a new line when you try generate for different Goterm.
Generate the list directly, no need to generate any other text except the list."#;

/// The built-in prompt with the paper's title, id and isoform filled in.
pub fn default_prompt(meta: &PaperMetadata) -> String {
    PROMPT_TEMPLATE
        .replace("{title}", &meta.title)
        .replace("{paperID}", &meta.paper_id)
        .replace("{name}", &meta.isoform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_filled() {
        let meta = PaperMetadata {
            isoform: "ABC1-b".to_string(),
            paper_id: "12345678".to_string(),
            title: "ABC1-b in cardiomyocytes".to_string(),
            ..Default::default()
        };
        let prompt = default_prompt(&meta);
        assert!(prompt.contains("titled 'ABC1-b in cardiomyocytes' with pubmedId '12345678'"));
        assert!(prompt.contains("You are looking for exactly **ABC1-b**"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_prompt_describes_record_format() {
        let prompt = default_prompt(&PaperMetadata::default());
        for label in ["Goterm 1:", "Name:", "Text Citation:", "Reason:"] {
            assert!(prompt.contains(label), "missing {label}");
        }
    }
}
